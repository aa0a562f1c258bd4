//! Closed set of mob species
//!
//! Каждый species дает: stat defaults, attack style (melee weapon или
//! projectile kind) и presentation profile для рендера.

use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;

use crate::ai::{AIConfig, AIState};
use crate::combat::{ProjectileKind, StatusEffect, StatusEffectKind, WeaponStats};
use crate::mob::spawn::{MobStats, SpawnError};
use crate::physics::Hitbox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Species {
    /// Slow melee brawler
    Zombie,
    /// Archer
    Skeleton,
    /// Poisoning melee blob
    Slime,
    /// Knife thrower, runs when hurt
    Goblin,
    /// Fast sword, crits
    Bandit,
    /// Fireball caster
    FireImp,
}

/// How a species resolves its strike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackStyle {
    Melee(WeaponStats),
    Ranged {
        kind: ProjectileKind,
        /// Cooldown между выстрелами (секунды)
        cooldown: f32,
    },
}

impl AttackStyle {
    pub fn cooldown(&self) -> f32 {
        match self {
            AttackStyle::Melee(weapon) => weapon.cooldown,
            AttackStyle::Ranged { cooldown, .. } => *cooldown,
        }
    }

    pub fn is_ranged(&self) -> bool {
        matches!(self, AttackStyle::Ranged { .. })
    }
}

/// Asset names the rendering collaborator resolves. Never drawn here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationProfile {
    pub sprite_set: &'static str,
    pub sound_bank: &'static str,
    pub idle_clip: &'static str,
    pub move_clip: &'static str,
    pub attack_clip: &'static str,
    pub hurt_clip: &'static str,
    pub death_clip: &'static str,
}

impl PresentationProfile {
    pub fn clip_for(&self, state: AIState) -> &'static str {
        match state {
            AIState::Idle => self.idle_clip,
            AIState::Wander | AIState::Chase | AIState::Flee => self.move_clip,
            AIState::Attack => self.attack_clip,
            AIState::Hurt => self.hurt_clip,
            AIState::Dead => self.death_clip,
        }
    }
}

impl Species {
    pub const ALL: [Species; 6] = [
        Species::Zombie,
        Species::Skeleton,
        Species::Slime,
        Species::Goblin,
        Species::Bandit,
        Species::FireImp,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Species::Zombie => "zombie",
            Species::Skeleton => "skeleton",
            Species::Slime => "slime",
            Species::Goblin => "goblin",
            Species::Bandit => "bandit",
            Species::FireImp => "fire_imp",
        }
    }

    pub fn attack_style(&self) -> AttackStyle {
        match self {
            Species::Zombie => AttackStyle::Melee(WeaponStats::claws()),
            Species::Skeleton => AttackStyle::Ranged {
                kind: ProjectileKind::Arrow,
                cooldown: 2.0,
            },
            Species::Slime => AttackStyle::Melee(WeaponStats::slime_body()),
            Species::Goblin => AttackStyle::Ranged {
                kind: ProjectileKind::ThrowingKnife,
                cooldown: 1.5,
            },
            Species::Bandit => AttackStyle::Melee(WeaponStats {
                crit_chance: 0.25,
                ..WeaponStats::melee_sword()
            }),
            Species::FireImp => AttackStyle::Ranged {
                kind: ProjectileKind::Fireball,
                cooldown: 2.5,
            },
        }
    }

    /// Stat defaults before per-spawn overrides.
    pub fn default_stats(&self) -> MobStats {
        let base = AIConfig::default();
        let (max_health, hitbox, ai) = match self {
            Species::Zombie => (
                40.0,
                Hitbox::new(28.0, 48.0),
                AIConfig {
                    detection_range: 250.0,
                    attack_range: 35.0,
                    lose_target_range: 400.0,
                    wander_range: 120.0,
                    wander_speed: 40.0,
                    chase_speed: 70.0,
                    ..base
                },
            ),
            Species::Skeleton => (
                30.0,
                Hitbox::new(26.0, 50.0),
                AIConfig {
                    detection_range: 400.0,
                    attack_range: 300.0,
                    lose_target_range: 550.0,
                    wander_speed: 50.0,
                    chase_speed: 80.0,
                    ..base
                },
            ),
            Species::Slime => (
                25.0,
                Hitbox::new(32.0, 24.0),
                AIConfig {
                    detection_range: 200.0,
                    attack_range: 30.0,
                    lose_target_range: 350.0,
                    wander_range: 100.0,
                    wander_speed: 30.0,
                    chase_speed: 60.0,
                    ..base
                },
            ),
            Species::Goblin => (
                20.0,
                Hitbox::new(24.0, 36.0),
                AIConfig {
                    detection_range: 320.0,
                    attack_range: 220.0,
                    lose_target_range: 480.0,
                    wander_range: 160.0,
                    wander_speed: 70.0,
                    chase_speed: 140.0,
                    flee_speed: 150.0,
                    flee_health_fraction: 0.4,
                    ..base
                },
            ),
            Species::Bandit => (
                50.0,
                Hitbox::new(28.0, 50.0),
                AIConfig {
                    detection_range: 300.0,
                    attack_range: 45.0,
                    lose_target_range: 450.0,
                    wander_range: 140.0,
                    wander_speed: 60.0,
                    chase_speed: 130.0,
                    ..base
                },
            ),
            Species::FireImp => (
                35.0,
                Hitbox::new(24.0, 32.0),
                AIConfig {
                    detection_range: 380.0,
                    attack_range: 260.0,
                    lose_target_range: 520.0,
                    wander_speed: 55.0,
                    chase_speed: 100.0,
                    ..base
                },
            ),
        };

        MobStats {
            max_health,
            hitbox,
            ai,
            attack: self.attack_style(),
            invincibility_duration: 0.4,
        }
    }

    pub fn presentation(&self) -> PresentationProfile {
        let (sprite_set, sound_bank) = match self {
            Species::Zombie => ("mobs/zombie", "zombie"),
            Species::Skeleton => ("mobs/skeleton", "bones"),
            Species::Slime => ("mobs/slime", "slime"),
            Species::Goblin => ("mobs/goblin", "goblin"),
            Species::Bandit => ("mobs/bandit", "humanoid"),
            Species::FireImp => ("mobs/fire_imp", "imp"),
        };
        PresentationProfile {
            sprite_set,
            sound_bank,
            idle_clip: "idle",
            move_clip: if *self == Species::Slime { "hop" } else { "walk" },
            attack_clip: if self.attack_style().is_ranged() { "cast" } else { "attack" },
            hurt_clip: "hurt",
            death_clip: "death",
        }
    }

    /// Effect this species' hits carry, if any.
    pub fn on_hit_effect(&self) -> Option<StatusEffectKind> {
        match self.attack_style() {
            AttackStyle::Melee(weapon) => weapon.on_hit.map(|effect: StatusEffect| effect.kind),
            AttackStyle::Ranged { kind, .. } => kind.spec().status.map(|effect| effect.kind),
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Species {
    type Err = SpawnError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "zombie" => Ok(Species::Zombie),
            "skeleton" => Ok(Species::Skeleton),
            "slime" => Ok(Species::Slime),
            "goblin" => Ok(Species::Goblin),
            "bandit" => Ok(Species::Bandit),
            "fire_imp" | "fireimp" => Ok(Species::FireImp),
            _ => Err(SpawnError::UnknownSpecies(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_ids_round_trip_through_from_str() {
        for species in Species::ALL {
            assert_eq!(species.id().parse::<Species>(), Ok(species));
        }
        assert_eq!("Fire-Imp".parse::<Species>(), Ok(Species::FireImp));
    }

    #[test]
    fn test_unknown_species_is_rejected() {
        let err = "dragon".parse::<Species>();
        assert_eq!(err, Err(SpawnError::UnknownSpecies("dragon".to_string())));
    }

    #[test]
    fn test_every_default_stat_block_validates() {
        for species in Species::ALL {
            assert_eq!(species.default_stats().validate(), Ok(()), "{species}");
        }
    }

    #[test]
    fn test_status_carriers() {
        assert_eq!(Species::Slime.on_hit_effect(), Some(StatusEffectKind::Poisoned));
        assert_eq!(Species::FireImp.on_hit_effect(), Some(StatusEffectKind::Burning));
        assert_eq!(Species::Zombie.on_hit_effect(), None);
    }

    #[test]
    fn test_presentation_clips() {
        let profile = Species::Skeleton.presentation();
        assert_eq!(profile.clip_for(AIState::Attack), "cast");
        assert_eq!(profile.clip_for(AIState::Chase), "walk");
        assert_eq!(Species::Slime.presentation().clip_for(AIState::Wander), "hop");
    }
}
