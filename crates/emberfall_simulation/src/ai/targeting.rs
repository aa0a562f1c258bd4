//! Target acquisition and edge-aware distance metrics.

use bevy::prelude::*;

use crate::entity::WorldSnapshot;
use crate::geometry::Bounds;

/// Non-owning handle to the current target + its bounds for this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetLock {
    pub entity: Entity,
    pub bounds: Bounds,
}

/// Revalidates `current` against the snapshot, otherwise picks the first
/// alive player-capable entity.
pub fn refresh_target(current: Option<Entity>, snapshot: &WorldSnapshot) -> Option<TargetLock> {
    let still_valid = current
        .and_then(|entity| snapshot.get(entity))
        .filter(|view| view.is_player_capable());

    still_valid
        .or_else(|| snapshot.first_player())
        .map(|view| TargetLock {
            entity: view.entity,
            bounds: view.bounds,
        })
}

/// Center → nearest point of the target rectangle. `f32::MAX` without a target.
pub fn edge_distance(from: Vec2, target: Option<&Bounds>) -> f32 {
    target.map_or(f32::MAX, |bounds| bounds.distance_to_point(from))
}

/// Center → near vertical edge of the target (left edge when `from` is left
/// of its center, right edge otherwise). `f32::MAX` without a target.
pub fn face_distance(from: Vec2, target: Option<&Bounds>) -> f32 {
    target.map_or(f32::MAX, |bounds| from.distance(bounds.face_point_toward(from)))
}

/// Horizontal direction (+1 / -1) from `from` to the target's near edge.
pub fn direction_to(from: Vec2, target: &Bounds) -> f32 {
    if target.face_x_toward(from.x) >= from.x {
        1.0
    } else {
        -1.0
    }
}
