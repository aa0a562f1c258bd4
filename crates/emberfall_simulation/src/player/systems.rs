//! Player ECS systems

use bevy::prelude::*;

use crate::combat::EntityDied;
use crate::entity::WorldSnapshot;
use crate::player::PlayerBody;
use crate::{SimulationConfig, SimulationSet};

/// Player Plugin
///
/// Регистрирует update_players в FixedUpdate (SimulationSet::Players).
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EntityDied>()
            .init_resource::<WorldSnapshot>()
            .add_systems(FixedUpdate, update_players.in_set(SimulationSet::Players));
    }
}

/// Система: timers, status effects, input и physics игрока
pub fn update_players(
    time: Res<Time<Fixed>>,
    config: Res<SimulationConfig>,
    snapshot: Res<WorldSnapshot>,
    mut players: Query<(Entity, &mut PlayerBody)>,
    mut deaths: EventWriter<EntityDied>,
) {
    let dt = time.delta_secs();

    for (entity, mut player) in players.iter_mut() {
        let report = player.update(dt, snapshot.solid_blocks(), &config.physics);

        if report.died {
            crate::log_info(&format!("Player {:?} succumbed to status effects", entity));
            deaths.write(EntityDied {
                entity,
                killer: None,
            });
        }
    }
}
