//! Tests for Mob::update / Combatant behaviour of the mob controller.

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::ai::{AIState, WanderBounds};
    use crate::combat::{DamageOutcome, ProjectileKind, StatusEffect, StatusEffectKind};
    use crate::entity::{Combatant, EntityKind, EntityView, Faction, WorldSnapshot};
    use crate::geometry::Bounds;
    use crate::mob::{Mob, MobEvent, SoundCategory, SpawnError, SpawnRecord, Species};

    const DT: f32 = 1.0 / 60.0;
    const MOB_ID: u32 = 1;
    const PLAYER_ID: u32 = 2;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    /// Mob standing on the default ground plane (y = 600).
    fn grounded(species: Species, x: f32) -> Mob {
        let height = species.default_stats().hitbox.height;
        let mut mob = Mob::new(species, Vec2::new(x, 600.0 - height));
        mob.bind_entity(Entity::from_raw(MOB_ID));
        mob
    }

    fn player_at(x: f32) -> EntityView {
        EntityView {
            entity: Entity::from_raw(PLAYER_ID),
            kind: EntityKind::Player,
            faction: Some(Faction::Player),
            bounds: Bounds::new(x, 552.0, 24.0, 48.0),
            facing_right: false,
            alive: true,
        }
    }

    #[test]
    fn test_detects_player_inside_detection_range() {
        // Scenario A: edge distance 250 < detection 300
        let mut stats = Species::Zombie.default_stats();
        stats.ai.detection_range = 300.0;
        stats.ai.lose_target_range = 450.0;
        let mut mob = Mob::with_stats(Species::Zombie, stats, Vec2::new(0.0, 552.0));
        let center_x = mob.body().center().x;
        let snapshot = WorldSnapshot::new(vec![player_at(center_x + 250.0)]);

        mob.update(DT, &snapshot, &mut rng());

        assert_eq!(mob.state(), AIState::Chase);
        assert_eq!(mob.target(), Some(Entity::from_raw(PLAYER_ID)));
        assert!(mob.velocity().x > 0.0);
        assert!(mob.animation_intent().facing_right);
    }

    #[test]
    fn test_player_outside_detection_is_ignored() {
        let mut mob = grounded(Species::Zombie, 0.0);
        let snapshot = WorldSnapshot::new(vec![player_at(600.0)]);

        mob.update(DT, &snapshot, &mut rng());

        assert_eq!(mob.state(), AIState::Idle);
        assert_eq!(mob.velocity().x, 0.0);
    }

    #[test]
    fn test_melee_attack_strikes_once() {
        // Scenario B: IDLE → CHASE → ATTACK, strike at 0.3s into ATTACK
        let mut mob = grounded(Species::Zombie, 0.0);
        let snapshot = WorldSnapshot::new(vec![player_at(30.0)]);
        let mut rng = rng();

        mob.update(DT, &snapshot, &mut rng);
        assert_eq!(mob.state(), AIState::Chase);
        mob.update(DT, &snapshot, &mut rng);
        assert_eq!(mob.state(), AIState::Attack);
        assert!(mob.drain_events().contains(&MobEvent::Sound(SoundCategory::Attack)));

        let mut strikes = Vec::new();
        for tick in 0..60 {
            let output = mob.update(DT, &snapshot, &mut rng);
            if !output.hits.is_empty() {
                strikes.push((tick, output));
            }
        }

        assert_eq!(strikes.len(), 1, "exactly one strike per attack");
        let (tick, output) = &strikes[0];
        // 18 ticks × 1/60 = 0.3s
        assert_eq!(*tick, 17);
        let hit = &output.hits[0];
        assert_eq!(hit.target, Entity::from_raw(PLAYER_ID));
        assert_eq!(hit.attacker, Some(Entity::from_raw(MOB_ID)));
        assert!(hit.damage >= 10.0);
        assert!(hit.knockback.x > 0.0 && hit.knockback.y < 0.0);
        assert!(output.projectiles.is_empty());

        // Cooldown keeps it in CHASE after the attack window
        assert_eq!(mob.state(), AIState::Chase);
        assert!(mob.attack_timer() > 0.0);
    }

    #[test]
    fn test_ranged_species_fires_projectile_at_target() {
        let mut mob = grounded(Species::Skeleton, 0.0);
        let center_x = mob.body().center().x;
        let snapshot = WorldSnapshot::new(vec![player_at(center_x + 200.0)]);
        let mut rng = rng();

        let mut fired = Vec::new();
        for _ in 0..40 {
            fired.extend(mob.update(DT, &snapshot, &mut rng).projectiles);
        }

        assert_eq!(fired.len(), 1);
        let arrow = &fired[0];
        assert_eq!(arrow.kind, ProjectileKind::Arrow);
        assert_eq!(arrow.faction, Faction::Hostile);
        assert_eq!(arrow.owner, Some(Entity::from_raw(MOB_ID)));
        assert!(arrow.velocity.x > 0.0);
        assert_abs_diff_eq!(arrow.velocity.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_killing_blow_keeps_knockback() {
        // Scenario C: lethal hit on a 50 HP mob
        let mut stats = Species::Bandit.default_stats();
        stats.max_health = 50.0;
        let mut mob = Mob::with_stats(Species::Bandit, stats, Vec2::new(0.0, 550.0));

        let outcome = mob.take_damage(60.0, Vec2::new(5.0, -3.0));

        assert_eq!(outcome, DamageOutcome::Killed);
        assert_eq!(mob.health().current(), 0.0);
        assert_eq!(mob.state(), AIState::Dead);
        assert_eq!(mob.velocity(), Vec2::new(5.0, -3.0));
        assert!(!mob.is_alive());

        let snapshot = WorldSnapshot::default();
        let mut rng = rng();
        for _ in 0..59 {
            mob.update(DT, &snapshot, &mut rng);
        }
        assert!(!mob.is_dead());
        assert_eq!(mob.velocity(), Vec2::ZERO);

        mob.update(DT, &snapshot, &mut rng);
        mob.update(DT, &snapshot, &mut rng);
        assert!(mob.is_dead());
        assert_eq!(mob.state(), AIState::Dead);
    }

    #[test]
    fn test_invincibility_makes_repeat_hits_idempotent() {
        let mut mob = grounded(Species::Zombie, 0.0);

        assert_eq!(mob.take_damage(5.0, Vec2::ZERO), DamageOutcome::Hurt);
        let after_first = mob.health().current();

        mob.update(DT, &WorldSnapshot::default(), &mut rng());
        let window = mob.invincibility().remaining();
        let health = mob.health().current();
        let velocity = mob.velocity();

        assert_eq!(mob.take_damage(5.0, Vec2::new(100.0, 0.0)), DamageOutcome::Ignored);
        assert_eq!(mob.health().current(), health);
        assert_eq!(health, after_first);
        assert_eq!(mob.velocity(), velocity);
        // Ignored hit doesn't restart the window
        assert_eq!(mob.invincibility().remaining(), window);
        assert!(mob.invincibility().is_active());
    }

    #[test]
    fn test_status_damage_ignores_hit_invincibility() {
        let mut stats = Species::Zombie.default_stats();
        stats.invincibility_duration = 2.0;
        let mut mob = Mob::with_stats(Species::Zombie, stats, Vec2::new(0.0, 552.0));
        let snapshot = WorldSnapshot::default();
        let mut rng = rng();

        mob.take_damage(5.0, Vec2::ZERO);
        mob.apply_status(StatusEffect::new(StatusEffectKind::Burning));
        let before = mob.health().current();

        // 0.5s → one burning tick, i-frames still running
        for _ in 0..30 {
            mob.update(DT, &snapshot, &mut rng);
        }

        assert!(mob.invincibility().is_active());
        assert_abs_diff_eq!(mob.health().current(), before - 5.0);
    }

    #[test]
    fn test_hurt_during_attack_resumes_attack() {
        let mut mob = grounded(Species::Zombie, 0.0);
        let snapshot = WorldSnapshot::new(vec![player_at(30.0)]);
        let mut rng = rng();

        mob.update(DT, &snapshot, &mut rng);
        mob.update(DT, &snapshot, &mut rng);
        assert_eq!(mob.state(), AIState::Attack);

        assert_eq!(mob.take_damage(5.0, Vec2::ZERO), DamageOutcome::Hurt);
        for _ in 0..17 {
            mob.update(DT, &snapshot, &mut rng);
            assert_eq!(mob.state(), AIState::Hurt);
        }
        mob.update(DT, &snapshot, &mut rng);
        assert_eq!(mob.state(), AIState::Attack);

        // The interrupted swing is replayed from the windup
        let mut strikes = 0;
        for _ in 0..18 {
            strikes += mob.update(DT, &snapshot, &mut rng).hits.len();
        }
        assert_eq!(strikes, 1);
    }

    #[test]
    fn test_health_stays_within_bounds() {
        let mut mob = grounded(Species::Slime, 0.0);
        let snapshot = WorldSnapshot::default();
        let mut rng = rng();
        let max = mob.health().max();

        for damage in [3.0, -10.0, 7.5, 1000.0, 4.0] {
            mob.take_damage(damage, Vec2::ZERO);
            for _ in 0..30 {
                mob.update(DT, &snapshot, &mut rng);
            }
            let current = mob.health().current();
            assert!((0.0..=max).contains(&current), "health {current} out of [0, {max}]");
        }

        assert_eq!(mob.state(), AIState::Dead);
        assert_eq!(mob.health().current(), 0.0);
    }

    #[test]
    fn test_hurt_resumes_previous_state_after_stagger() {
        let mut mob = grounded(Species::Zombie, 0.0);
        let snapshot = WorldSnapshot::default();
        let mut rng = rng();

        mob.take_damage(5.0, Vec2::new(-120.0, 0.0));
        assert_eq!(mob.state(), AIState::Hurt);
        assert!(mob.drain_events().contains(&MobEvent::Sound(SoundCategory::Hurt)));

        for _ in 0..17 {
            mob.update(DT, &snapshot, &mut rng);
        }
        assert_eq!(mob.state(), AIState::Hurt);
        assert!(mob.animation_intent().hurt_progress > 0.9);
        // Knockback decays while staggered
        assert!(mob.velocity().x > -120.0 && mob.velocity().x <= 0.0);

        mob.update(DT, &snapshot, &mut rng);
        assert_eq!(mob.state(), AIState::Idle);
        assert_eq!(mob.animation_intent().hurt_progress, 0.0);
    }

    #[test]
    fn test_status_damage_can_kill() {
        let mut mob = grounded(Species::Zombie, 0.0);
        let snapshot = WorldSnapshot::default();
        let mut rng = rng();

        mob.apply_status(StatusEffect::new(StatusEffectKind::Poisoned).with_damage_per_tick(100.0));

        for _ in 0..61 {
            let output = mob.update(DT, &snapshot, &mut rng);
            assert!(output.is_empty());
        }

        assert_eq!(mob.state(), AIState::Dead);
        assert_eq!(mob.health().current(), 0.0);
        assert!(mob.status_effects().is_empty());
        assert!(mob.drain_events().contains(&MobEvent::Sound(SoundCategory::Death)));
    }

    #[test]
    fn test_frozen_halves_chase_speed() {
        let mut mob = grounded(Species::Zombie, 0.0);
        let chase_speed = mob.stats().ai.chase_speed;
        mob.apply_status(StatusEffect::new(StatusEffectKind::Frozen));
        let snapshot = WorldSnapshot::new(vec![player_at(200.0)]);

        mob.update(DT, &snapshot, &mut rng());

        assert_eq!(mob.state(), AIState::Chase);
        assert_abs_diff_eq!(mob.velocity().x, chase_speed * 0.5, epsilon = 1e-3);
        assert_eq!(
            mob.animation_intent().tint,
            Some(StatusEffectKind::Frozen.tint())
        );
    }

    #[test]
    fn test_drift_outside_bounds_retargets_inside() {
        let mut mob = grounded(Species::Zombie, 276.0);
        // center.x = 290
        mob.set_wander_bounds(WanderBounds::new(0.0, 200.0));

        mob.update(DT, &WorldSnapshot::default(), &mut rng());

        assert_eq!(mob.wander_target(), Some(180.0));
    }

    #[test]
    fn test_idle_times_out_into_wander() {
        let mut mob = grounded(Species::Zombie, 0.0);
        let snapshot = WorldSnapshot::default();
        let mut rng = rng();

        for _ in 0..121 {
            mob.update(DT, &snapshot, &mut rng);
        }

        assert_eq!(mob.state(), AIState::Wander);
        let center_x = mob.body().center().x;
        let target = mob.wander_target().unwrap_or(center_x);
        let bounds = mob.wander_bounds();
        assert!(target >= bounds.min_x && target <= bounds.max_x);
    }

    #[test]
    fn test_from_spawn_rejects_unknown_species() {
        let record = SpawnRecord::new("dragon", 0.0, 0.0);

        let result = Mob::from_spawn(&record);

        assert_eq!(
            result.map(|mob| mob.species()).err(),
            Some(SpawnError::UnknownSpecies("dragon".to_string()))
        );
    }
}
