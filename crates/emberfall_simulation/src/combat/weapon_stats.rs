//! Weapon stats (melee)
//!
//! Ranged attackers don't carry a WeaponStats: they fire a ProjectileKind
//! and the projectile spec holds damage/knockback.

use bevy::math::Vec2;
use rand::Rng;

use crate::combat::damage::{calculate_damage, charge_multiplier, roll_crit};
use crate::combat::hitbox::{arc_half_width_for_attack_speed, MeleeArc};
use crate::combat::StatusEffect;

/// Melee weapon parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    /// Базовый урон (до модификаторов)
    pub base_damage: f32,
    pub damage_multiplier: f32,
    /// Swings per second, drives the arc width
    pub attack_speed: f32,
    /// Reach from the attacker's center (px)
    pub range: f32,
    pub crit_chance: f32,
    pub crit_multiplier: f32,
    /// Horizontal knockback (px/s), pushed away from the attacker
    pub knockback: f32,
    /// Upward knockback (px/s)
    pub knockback_lift: f32,
    /// Cooldown между атаками (секунды)
    pub cooldown: f32,
    /// Effect attached to every landed hit
    pub on_hit: Option<StatusEffect>,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self::melee_sword()
    }
}

impl WeaponStats {
    /// Меч: быстрый, узкая дуга, криты
    pub fn melee_sword() -> Self {
        Self {
            base_damage: 12.0,
            damage_multiplier: 1.0,
            attack_speed: 1.5,
            range: 55.0,
            crit_chance: 0.2,
            crit_multiplier: 2.0,
            knockback: 180.0,
            knockback_lift: 80.0,
            cooldown: 1.0,
            on_hit: None,
        }
    }

    /// Когти: медленный широкий удар
    pub fn claws() -> Self {
        Self {
            base_damage: 10.0,
            damage_multiplier: 1.0,
            attack_speed: 0.8,
            range: 40.0,
            crit_chance: 0.0,
            crit_multiplier: 2.0,
            knockback: 150.0,
            knockback_lift: 60.0,
            cooldown: 1.5,
            on_hit: None,
        }
    }

    /// Slime body slam, poisons on hit
    pub fn slime_body() -> Self {
        Self {
            base_damage: 6.0,
            damage_multiplier: 1.0,
            attack_speed: 0.6,
            range: 30.0,
            crit_chance: 0.0,
            crit_multiplier: 2.0,
            knockback: 100.0,
            knockback_lift: 40.0,
            cooldown: 1.2,
            on_hit: Some(StatusEffect::new(crate::combat::StatusEffectKind::Poisoned)),
        }
    }

    pub fn arc_half_width(&self) -> f32 {
        arc_half_width_for_attack_speed(self.attack_speed)
    }

    /// Swing arc from `origin` in the facing direction.
    pub fn arc(&self, origin: Vec2, facing_right: bool) -> MeleeArc {
        MeleeArc::from_facing(origin, facing_right, self.range, self.attack_speed)
    }

    /// Final damage for one hit. Returns (damage, was_crit).
    pub fn roll_damage(&self, charge_seconds: f32, rng: &mut impl Rng) -> (f32, bool) {
        let is_crit = roll_crit(rng, self.crit_chance);
        let crit = if is_crit { self.crit_multiplier } else { 1.0 };
        let damage = calculate_damage(
            self.base_damage,
            self.damage_multiplier,
            charge_multiplier(charge_seconds),
            crit,
        );
        (damage, is_crit)
    }

    /// Knockback vector for a swing toward `facing_right` (y-down, lift is up).
    pub fn knockback_toward(&self, facing_right: bool) -> Vec2 {
        let direction = if facing_right { 1.0 } else { -1.0 };
        Vec2::new(self.knockback * direction, -self.knockback_lift)
    }
}
