//! Combat ECS systems
//!
//! Порядок (FixedUpdate):
//! 1. update_projectiles: Projectiles: полет + hits в PendingHits
//! 2. apply_pending_hits: Resolve: PendingHit → take_damage / apply_status
//! 3. spawn_pending_projectiles: Resolve: новые projectiles от мобов
//! 4. despawn_spent_projectiles: Cleanup

use bevy::prelude::*;

use crate::combat::{DamageDealt, DamageOutcome, EntityDied, PendingHit, Projectile};
use crate::entity::{Combatant, WorldSnapshot};
use crate::mob::systems::forward_mob_events;
use crate::mob::{Mob, MobSoundEvent};
use crate::player::PlayerBody;
use crate::SimulationSet;

/// Hits produced during the current tick, applied in Resolve.
#[derive(Resource, Debug, Default)]
pub struct PendingHits {
    hits: Vec<PendingHit>,
}

impl PendingHits {
    pub fn push(&mut self, hit: PendingHit) {
        self.hits.push(hit);
    }

    pub fn extend(&mut self, hits: impl IntoIterator<Item = PendingHit>) {
        self.hits.extend(hits);
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, PendingHit> {
        self.hits.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Projectiles created during the current tick, spawned in Resolve.
#[derive(Resource, Debug, Default)]
pub struct PendingProjectiles {
    projectiles: Vec<Projectile>,
}

impl PendingProjectiles {
    pub fn extend(&mut self, projectiles: impl IntoIterator<Item = Projectile>) {
        self.projectiles.extend(projectiles);
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, Projectile> {
        self.projectiles.drain(..)
    }
}

/// Combat Plugin
///
/// Регистрирует события, буферы и combat системы в FixedUpdate.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<MobSoundEvent>()
            .init_resource::<WorldSnapshot>()
            .init_resource::<PendingHits>()
            .init_resource::<PendingProjectiles>();

        app.add_systems(
            FixedUpdate,
            (
                update_projectiles.in_set(SimulationSet::Projectiles),
                (apply_pending_hits, spawn_pending_projectiles)
                    .chain()
                    .in_set(SimulationSet::Resolve),
                despawn_spent_projectiles.in_set(SimulationSet::Cleanup),
            ),
        );
    }
}

/// Система: двигаем projectiles, их попадания → PendingHits
pub fn update_projectiles(
    time: Res<Time<Fixed>>,
    snapshot: Res<WorldSnapshot>,
    mut pending_hits: ResMut<PendingHits>,
    mut projectiles: Query<(Entity, &mut Projectile)>,
) {
    let dt = time.delta_secs();

    let mut projectiles: Vec<_> = projectiles.iter_mut().collect();
    projectiles.sort_by_key(|(entity, _)| *entity);

    for (entity, mut projectile) in projectiles {
        let step = projectile.update(dt, &snapshot);

        if let Some(center) = step.exploded_at {
            crate::log(&format!(
                "{:?} {:?} exploded at ({:.1}, {:.1}), {} targets",
                projectile.kind,
                entity,
                center.x,
                center.y,
                step.hits.len()
            ));
        }
        pending_hits.extend(step.hits);
    }
}

/// Applies one hit to a combatant: damage + knockback, then the status
/// effect if the hit landed.
pub fn resolve_hit(target: &mut impl Combatant, hit: &PendingHit) -> DamageOutcome {
    let outcome = target.take_damage(hit.effective_damage(), hit.knockback);
    if outcome.landed() {
        if let Some(status) = hit.status {
            target.apply_status(status);
        }
    }
    outcome
}

/// Система: применяем накопленные PendingHit'ы
///
/// Цель, исчезнувшая с момента снимка, пропускается.
pub fn apply_pending_hits(
    mut pending_hits: ResMut<PendingHits>,
    mut mobs: Query<&mut Mob>,
    mut players: Query<&mut PlayerBody>,
    mut damage_dealt: EventWriter<DamageDealt>,
    mut deaths: EventWriter<EntityDied>,
    mut sounds: EventWriter<MobSoundEvent>,
) {
    for hit in pending_hits.drain() {
        let outcome = if let Ok(mut mob) = mobs.get_mut(hit.target) {
            let outcome = resolve_hit(mob.as_mut(), &hit);
            forward_mob_events(hit.target, &mut mob, &mut sounds);
            outcome
        } else if let Ok(mut player) = players.get_mut(hit.target) {
            resolve_hit(player.as_mut(), &hit)
        } else {
            crate::log_warning(&format!("PendingHit: target {:?} is gone", hit.target));
            continue;
        };

        if !outcome.landed() {
            continue;
        }

        let target_died = outcome == DamageOutcome::Killed;
        damage_dealt.write(DamageDealt {
            attacker: hit.attacker,
            target: hit.target,
            damage: hit.effective_damage(),
            is_crit: hit.is_crit,
            target_died,
        });

        if target_died {
            deaths.write(EntityDied {
                entity: hit.target,
                killer: hit.attacker,
            });
            crate::log_info(&format!("Entity {:?} killed by {:?}", hit.target, hit.attacker));
        }
    }
}

/// Система: spawn projectiles, созданных мобами в этом тике
pub fn spawn_pending_projectiles(
    mut commands: Commands,
    mut pending: ResMut<PendingProjectiles>,
) {
    for projectile in pending.drain() {
        crate::log(&format!(
            "Spawned {:?} from {:?}",
            projectile.kind, projectile.owner
        ));
        commands.spawn(projectile);
    }
}

/// Система: despawn consumed / expired projectiles
pub fn despawn_spent_projectiles(
    mut commands: Commands,
    projectiles: Query<(Entity, &Projectile)>,
) {
    for (entity, projectile) in projectiles.iter() {
        if projectile.is_consumed() {
            commands.entity(entity).despawn();
        }
    }
}
