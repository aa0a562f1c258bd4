//! Tests for projectile flight, piercing and explosions.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::combat::{Projectile, ProjectileKind, StatusEffectKind};
    use crate::entity::{EntityKind, EntityView, Faction, WorldSnapshot};
    use crate::geometry::Bounds;

    const DT: f32 = 1.0 / 60.0;

    fn combatant(index: u32, kind: EntityKind, faction: Faction, bounds: Bounds) -> EntityView {
        EntityView {
            entity: Entity::from_raw(index),
            kind,
            faction: Some(faction),
            bounds,
            facing_right: true,
            alive: true,
        }
    }

    fn block(index: u32, bounds: Bounds) -> EntityView {
        EntityView {
            entity: Entity::from_raw(index),
            kind: EntityKind::Block,
            faction: None,
            bounds,
            facing_right: true,
            alive: true,
        }
    }

    #[test]
    fn test_every_kind_has_sane_defaults() {
        for kind in ProjectileKind::ALL {
            let spec = kind.spec();
            assert!(spec.speed > 0.0, "{kind:?}");
            assert!(spec.lifetime_frames > 0, "{kind:?}");
            assert!(spec.damage >= 0.0, "{kind:?}");
        }

        let explosive: Vec<_> = ProjectileKind::ALL
            .into_iter()
            .filter(ProjectileKind::is_explosive)
            .collect();
        assert_eq!(
            explosive,
            vec![ProjectileKind::Fireball, ProjectileKind::Potion, ProjectileKind::Bomb]
        );
    }

    #[test]
    fn test_straight_projectile_expires_after_lifetime() {
        let snapshot = WorldSnapshot::default();
        let mut bolt = Projectile::launch(
            ProjectileKind::MagicBolt,
            Vec2::ZERO,
            Vec2::X,
            Faction::Hostile,
            None,
        );

        for frame in 1..120 {
            let step = bolt.update(DT, &snapshot);
            assert!(!step.expired, "expired early at frame {frame}");
        }

        let step = bolt.update(DT, &snapshot);
        assert!(step.expired);
        assert!(step.exploded_at.is_none());
        // Straight flight: no vertical drift
        assert_eq!(bolt.position.y, 0.0);
    }

    #[test]
    fn test_thrown_kinds_arc_downward() {
        let snapshot = WorldSnapshot::default();
        let mut rock = Projectile::launch(ProjectileKind::Rock, Vec2::ZERO, Vec2::X, Faction::Player, None);

        for _ in 0..30 {
            rock.update(DT, &snapshot);
        }

        assert!(rock.velocity.y > 0.0);
        assert!(rock.position.y > 0.0);
    }

    #[test]
    fn test_piercing_bolt_hits_each_target_once() {
        let first = Entity::from_raw(1);
        let second = Entity::from_raw(2);
        let snapshot = WorldSnapshot::new(vec![
            combatant(1, EntityKind::Mob, Faction::Hostile, Bounds::new(100.0, -20.0, 20.0, 40.0)),
            combatant(2, EntityKind::Mob, Faction::Hostile, Bounds::new(200.0, -20.0, 20.0, 40.0)),
        ]);
        let mut bolt = Projectile::launch(ProjectileKind::Bolt, Vec2::ZERO, Vec2::X, Faction::Player, None);

        let mut struck = Vec::new();
        let mut expired = false;
        for _ in 0..60 {
            let step = bolt.update(DT, &snapshot);
            struck.extend(step.hits.iter().map(|hit| hit.target));
            if step.expired {
                expired = true;
                break;
            }
        }

        assert_eq!(struck, vec![first, second]);
        assert!(expired, "bolt with piercing 1 is consumed by its second target");
        assert_eq!(bolt.hit_entities(), &[first, second]);
    }

    #[test]
    fn test_block_consumes_projectile() {
        let snapshot = WorldSnapshot::new(vec![
            block(1, Bounds::new(50.0, -50.0, 20.0, 100.0)),
            combatant(2, EntityKind::Player, Faction::Player, Bounds::new(100.0, -20.0, 20.0, 40.0)),
        ]);
        let mut arrow = Projectile::launch(ProjectileKind::Arrow, Vec2::ZERO, Vec2::X, Faction::Hostile, None);

        let mut hits = 0;
        let mut expired = false;
        for _ in 0..30 {
            let step = arrow.update(DT, &snapshot);
            hits += step.hits.len();
            if step.expired {
                expired = true;
                break;
            }
        }

        assert!(expired);
        assert_eq!(hits, 0, "the player is behind the wall");
        assert!(arrow.is_consumed());
    }

    #[test]
    fn test_same_faction_is_passed_through() {
        let snapshot = WorldSnapshot::new(vec![combatant(
            1,
            EntityKind::Mob,
            Faction::Hostile,
            Bounds::new(20.0, -20.0, 20.0, 40.0),
        )]);
        let mut knife = Projectile::launch(
            ProjectileKind::ThrowingKnife,
            Vec2::ZERO,
            Vec2::X,
            Faction::Hostile,
            None,
        );

        for _ in 0..10 {
            let step = knife.update(DT, &snapshot);
            assert!(step.hits.is_empty());
            assert!(!step.expired);
        }
    }

    #[test]
    fn test_bomb_explosion_hits_everything_in_radius() {
        let near = Entity::from_raw(1);
        let beside = Entity::from_raw(2);
        let snapshot = WorldSnapshot::new(vec![
            combatant(1, EntityKind::Player, Faction::Player, Bounds::new(-20.0, -20.0, 40.0, 40.0)),
            combatant(2, EntityKind::Player, Faction::Player, Bounds::new(60.0, -20.0, 40.0, 40.0)),
            combatant(3, EntityKind::Player, Faction::Player, Bounds::new(400.0, -20.0, 40.0, 40.0)),
            combatant(4, EntityKind::Mob, Faction::Hostile, Bounds::new(30.0, -20.0, 20.0, 40.0)),
        ]);
        let mut bomb = Projectile::launch(ProjectileKind::Bomb, Vec2::ZERO, Vec2::X, Faction::Hostile, None);

        let step = bomb.update(DT, &snapshot);

        assert!(step.expired);
        assert!(step.exploded_at.is_some());
        let targets: Vec<_> = step.hits.iter().map(|hit| hit.target).collect();
        assert_eq!(targets, vec![near, beside]);

        let push = step.hits[1].knockback;
        assert!(push.x > 0.0, "knockback points away from the blast");
        assert_eq!(step.hits[1].damage, ProjectileKind::Bomb.spec().damage);
    }

    #[test]
    fn test_fireball_carries_burning_and_detonates_on_expiry() {
        let snapshot = WorldSnapshot::default();
        let mut fireball = Projectile::launch(
            ProjectileKind::Fireball,
            Vec2::ZERO,
            Vec2::NEG_X,
            Faction::Hostile,
            None,
        );
        assert_eq!(fireball.status.map(|s| s.kind), Some(StatusEffectKind::Burning));

        let mut last = None;
        for _ in 0..ProjectileKind::Fireball.spec().lifetime_frames {
            last = Some(fireball.update(DT, &snapshot));
        }

        let last = last.unwrap_or_default();
        assert!(last.expired);
        assert!(last.exploded_at.is_some());
        assert!(fireball.position.x < 0.0);
    }
}
