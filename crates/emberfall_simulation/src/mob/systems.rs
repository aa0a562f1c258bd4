//! Mob ECS systems
//!
//! Порядок (FixedUpdate, см. SimulationSet):
//! 1. build_world_snapshot: Snapshot: плоский снимок entity списка
//! 2. update_mobs: Mobs: Mob::update для каждого моба, hits/projectiles
//!    копятся в PendingHits / PendingProjectiles
//! 3. despawn_dead_mobs: Cleanup: DEAD дольше grace period → despawn

use bevy::prelude::*;

use crate::ai::AIState;
use crate::combat::{EntityDied, PendingHits, PendingProjectiles, Projectile};
use crate::entity::{Combatant, EntityKind, EntityView, SolidBlock, WorldSnapshot};
use crate::mob::{Mob, MobEvent, SoundCategory, Species};
use crate::player::PlayerBody;
use crate::{DeterministicRng, SimulationConfig, SimulationSet};

/// Событие: мобу нужен звук (fire-and-forget)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct MobSoundEvent {
    pub entity: Entity,
    pub species: Species,
    pub category: SoundCategory,
}

/// Mob Plugin
///
/// Регистрирует mob системы в FixedUpdate.
pub struct MobPlugin;

impl Plugin for MobPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MobSoundEvent>()
            .add_event::<EntityDied>()
            .init_resource::<WorldSnapshot>()
            .init_resource::<PendingHits>()
            .init_resource::<PendingProjectiles>();

        app.add_systems(
            FixedUpdate,
            (
                build_world_snapshot.in_set(SimulationSet::Snapshot),
                update_mobs.in_set(SimulationSet::Mobs),
                despawn_dead_mobs.in_set(SimulationSet::Cleanup),
            ),
        );
    }
}

/// Система: собрать WorldSnapshot
///
/// Порядок entity в снимке = порядок Entity id (стабилен для одного seed).
pub fn build_world_snapshot(
    mut snapshot: ResMut<WorldSnapshot>,
    blocks: Query<(Entity, &SolidBlock)>,
    players: Query<(Entity, &PlayerBody)>,
    mobs: Query<(Entity, &Mob)>,
    projectiles: Query<(Entity, &Projectile)>,
) {
    let mut views = Vec::new();

    views.extend(blocks.iter().map(|(entity, block)| EntityView {
        entity,
        kind: EntityKind::Block,
        faction: None,
        bounds: block.bounds,
        facing_right: true,
        alive: true,
    }));

    views.extend(players.iter().map(|(entity, player)| EntityView {
        entity,
        kind: EntityKind::Player,
        faction: Some(player.faction()),
        bounds: player.bounds(),
        facing_right: player.is_facing_right(),
        alive: player.is_alive(),
    }));

    views.extend(mobs.iter().map(|(entity, mob)| EntityView {
        entity,
        kind: EntityKind::Mob,
        faction: Some(mob.faction()),
        bounds: mob.bounds(),
        facing_right: mob.is_facing_right(),
        alive: mob.is_alive(),
    }));

    views.extend(projectiles.iter().map(|(entity, projectile)| EntityView {
        entity,
        kind: EntityKind::Projectile,
        faction: Some(projectile.faction),
        bounds: projectile.bounds(),
        facing_right: projectile.velocity.x >= 0.0,
        alive: !projectile.is_consumed(),
    }));

    views.sort_by_key(|view| view.entity);
    *snapshot = WorldSnapshot::new(views);
}

/// Система: Mob::update для всех мобов
///
/// Все мобы читают один и тот же снимок; изменения других entity
/// откладываются до Resolve.
pub fn update_mobs(
    time: Res<Time<Fixed>>,
    config: Res<SimulationConfig>,
    snapshot: Res<WorldSnapshot>,
    mut rng: ResMut<DeterministicRng>,
    mut pending_hits: ResMut<PendingHits>,
    mut pending_projectiles: ResMut<PendingProjectiles>,
    mut mobs: Query<(Entity, &mut Mob)>,
    mut sounds: EventWriter<MobSoundEvent>,
    mut deaths: EventWriter<EntityDied>,
) {
    let dt = time.delta_secs();

    // RNG consumption order must not depend on archetype layout
    let mut mobs: Vec<_> = mobs.iter_mut().collect();
    mobs.sort_by_key(|(entity, _)| *entity);

    for (entity, mut mob) in mobs {
        mob.set_physics(config.physics);
        mob.bind_entity(entity);

        let was_alive = mob.state() != AIState::Dead;
        let output = mob.update(dt, &snapshot, &mut rng.rng);

        pending_hits.extend(output.hits);
        pending_projectiles.extend(output.projectiles);
        forward_mob_events(entity, &mut mob, &mut sounds);

        if was_alive && mob.state() == AIState::Dead {
            crate::log_info(&format!(
                "Mob {:?} ({}) succumbed to status effects",
                entity,
                mob.species()
            ));
            deaths.write(EntityDied {
                entity,
                killer: None,
            });
        }
    }
}

/// Drains mob events: state changes → debug log, sound cues → MobSoundEvent.
pub(crate) fn forward_mob_events(
    entity: Entity,
    mob: &mut Mob,
    sounds: &mut EventWriter<MobSoundEvent>,
) {
    let species = mob.species();
    for event in mob.drain_events() {
        match event {
            MobEvent::StateChanged { from, to } => {
                crate::log(&format!(
                    "Mob {:?} ({}): {} → {}",
                    entity,
                    species,
                    from.as_str(),
                    to.as_str()
                ));
            }
            MobEvent::Sound(category) => {
                sounds.write(MobSoundEvent {
                    entity,
                    species,
                    category,
                });
            }
        }
    }
}

/// Система: despawn мобов, чей DEAD длится дольше grace period
pub fn despawn_dead_mobs(mut commands: Commands, mobs: Query<(Entity, &Mob)>) {
    for (entity, mob) in mobs.iter() {
        if mob.is_dead() {
            commands.entity(entity).despawn();
            crate::log_info(&format!("Despawned dead mob {:?} ({})", entity, mob.species()));
        }
    }
}
