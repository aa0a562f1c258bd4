//! Emberfall Simulation Core
//!
//! 2D platformer mob AI + physics + combat на Bevy 0.16 (headless).
//!
//! Архитектура:
//! - Core = plain Rust (Mob, PlayerBody, Projectile, KinematicBody), никакого
//!   доступа к ECS внутри: все читают WorldSnapshot и возвращают данные
//! - ECS = scheduling (FixedUpdate 60Hz), буферы PendingHits /
//!   PendingProjectiles, события, despawn
//! - Rendering / audio / input / level parsing: внешние collaborators

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod entity;
pub mod geometry;
pub mod logger;
pub mod mob;
pub mod physics;
pub mod player;

// Re-export базовых типов для удобства
pub use ai::{AIConfig, AIState};
pub use combat::{
    CombatPlugin, DamageDealt, DamageOutcome, EntityDied, MeleeArc, PendingHit, Projectile,
    ProjectileKind, StatusEffect, StatusEffectKind, WeaponStats,
};
pub use components::Health;
pub use entity::{Combatant, EntityKind, EntityView, Faction, SolidBlock, WorldSnapshot};
pub use geometry::Bounds;
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, LogLevel};
pub use mob::{Mob, MobPlugin, MobSoundEvent, SpawnError, SpawnRecord, Species};
pub use physics::PhysicsConfig;
pub use player::{PlayerBody, PlayerPlugin};

/// Порядок систем внутри одного fixed тика
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Flatten the entity list into WorldSnapshot
    Snapshot,
    /// Mob::update (reads the snapshot only)
    Mobs,
    /// PlayerBody::update
    Players,
    /// Projectile flight
    Projectiles,
    /// Apply PendingHits, spawn PendingProjectiles
    Resolve,
    /// Despawn dead mobs / spent projectiles
    Cleanup,
}

/// Настройки симуляции
#[derive(Resource, Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed tick rate (Hz)
    pub tick_hz: f64,
    /// Seed for DeterministicRng
    pub seed: u64,
    pub physics: PhysicsConfig,
    pub log_level: LogLevel,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            seed: 42,
            physics: PhysicsConfig::default(),
            log_level: LogLevel::Info,
        }
    }
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Uses an already inserted SimulationConfig / DeterministicRng when present.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .copied()
            .unwrap_or_default();
        set_log_level(config.log_level);

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(config.seed));
        }

        app
            // Fixed timestep (60Hz по умолчанию)
            .insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
            .insert_resource(config)
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Snapshot,
                    SimulationSet::Mobs,
                    SimulationSet::Players,
                    SimulationSet::Projectiles,
                    SimulationSet::Resolve,
                    SimulationSet::Cleanup,
                )
                    .chain(),
            )
            .add_plugins((MobPlugin, PlayerPlugin, CombatPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(SimulationConfig {
            seed,
            ..Default::default()
        })
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}

/// Один fixed тик: двигает Time<Fixed> на timestep и гоняет FixedUpdate.
///
/// Headless host / тесты не зависят от wall clock.
pub fn step_fixed(app: &mut App) {
    let world = app.world_mut();
    {
        let mut time = world.resource_mut::<Time<Fixed>>();
        let timestep = time.timestep();
        time.advance_by(timestep);
    }
    world.run_schedule(FixedUpdate);
}

/// Spawns every record; the first malformed one aborts with its error.
pub fn spawn_mobs(world: &mut World, records: &[SpawnRecord]) -> Result<Vec<Entity>, SpawnError> {
    let physics = world
        .get_resource::<SimulationConfig>()
        .map(|config| config.physics)
        .unwrap_or_default();

    let mut spawned = Vec::with_capacity(records.len());
    for record in records {
        let mob = match Mob::from_spawn(record) {
            Ok(mob) => mob.with_physics(physics),
            Err(err) => {
                log_error(&format!("Rejected spawn record {:?}: {}", record.species, err));
                return Err(err);
            }
        };
        let entity = world.spawn(mob).id();
        log(&format!(
            "Spawned {} at ({:.0}, {:.0}) as {:?}",
            record.species, record.x, record.y, entity
        ));
        spawned.push(entity);
    }
    Ok(spawned)
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_config_from_json() {
        let config: SimulationConfig = serde_json::from_str(
            r#"{ "seed": 7, "physics": { "gravity": 1200.0 }, "log_level": "warning" }"#,
        )
        .unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.tick_hz, 60.0);
        assert_eq!(config.physics.gravity, 1200.0);
        assert_eq!(config.physics.ground_y, PhysicsConfig::default().ground_y);
        assert_eq!(config.log_level, LogLevel::Warning);
    }

    #[test]
    fn test_spawn_mobs_rejects_malformed_record() {
        let mut world = World::new();
        let records = vec![
            SpawnRecord::new("zombie", 0.0, 0.0),
            SpawnRecord::new("kraken", 0.0, 0.0),
        ];

        let result = spawn_mobs(&mut world, &records);

        assert_eq!(result, Err(SpawnError::UnknownSpecies("kraken".to_string())));
    }
}
