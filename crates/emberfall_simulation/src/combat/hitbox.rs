//! Melee arc hit-test
//!
//! Архитектура:
//! - MeleeArc живет одну атаку: создается при ударе → hit-test → drop
//! - Rectangle vs arc через sampling: center, corners, edge midpoints of the
//!   target + 3 radial × 5 angular samples of the arc
//! - Half-width выводится из attack speed (быстрое оружие → узкая дуга)

use bevy::math::Vec2;

use crate::geometry::{angle_between, facing_angle, Bounds};

pub const MIN_ARC_HALF_WIDTH_DEG: f32 = 30.0;
pub const MAX_ARC_HALF_WIDTH_DEG: f32 = 120.0;

const RADIAL_SAMPLES: usize = 3;
const ANGULAR_SAMPLES: usize = 5;

const RANGE_TOLERANCE: f32 = 1e-3;
const ANGLE_TOLERANCE: f32 = 1e-5;

/// Arc half-width (radians) for a weapon attack speed.
///
/// - speed ≥ 2.0: 35°
/// - 1.0 ≤ speed < 2.0: 75° → 45° linearly
/// - speed < 1.0: 90° + (1 - speed) × 30°
///
/// Result clamped into [30°, 120°].
pub fn arc_half_width_for_attack_speed(attack_speed: f32) -> f32 {
    let degrees = if attack_speed >= 2.0 {
        35.0
    } else if attack_speed >= 1.0 {
        75.0 - (attack_speed - 1.0) * 30.0
    } else {
        90.0 + (1.0 - attack_speed) * 30.0
    };
    degrees
        .clamp(MIN_ARC_HALF_WIDTH_DEG, MAX_ARC_HALF_WIDTH_DEG)
        .to_radians()
}

/// Ephemeral melee sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeleeArc {
    pub origin: Vec2,
    /// Radians, 0 = +x
    pub facing_angle: f32,
    pub range: f32,
    /// Radians, always within [30°, 120°]
    pub half_width: f32,
}

impl MeleeArc {
    /// Half-width is clamped, negative range is treated as zero.
    pub fn new(origin: Vec2, facing_angle: f32, range: f32, half_width: f32) -> Self {
        Self {
            origin,
            facing_angle,
            range: range.max(0.0),
            half_width: half_width.clamp(
                MIN_ARC_HALF_WIDTH_DEG.to_radians(),
                MAX_ARC_HALF_WIDTH_DEG.to_radians(),
            ),
        }
    }

    /// Horizontal swing for a weapon of `attack_speed`.
    pub fn from_facing(origin: Vec2, facing_right: bool, range: f32, attack_speed: f32) -> Self {
        Self::new(
            origin,
            facing_angle(facing_right),
            range,
            arc_half_width_for_attack_speed(attack_speed),
        )
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        let offset = point - self.origin;
        let distance = offset.length();
        if distance > self.range + RANGE_TOLERANCE {
            return false;
        }
        if distance <= f32::EPSILON {
            return true;
        }
        let angle = offset.y.atan2(offset.x);
        angle_between(angle, self.facing_angle) <= self.half_width + ANGLE_TOLERANCE
    }

    /// Sampled arc vs rectangle test.
    pub fn hits(&self, target: &Bounds) -> bool {
        if target.contains_point(self.origin) {
            return true;
        }

        let target_points = std::iter::once(target.center())
            .chain(target.corners())
            .chain(target.edge_midpoints());
        if target_points.into_iter().any(|p| self.contains_point(p)) {
            return true;
        }

        self.sample_points().any(|p| target.contains_point(p))
    }

    /// 3 radial × 5 angular points spread over the arc.
    pub fn sample_points(&self) -> impl Iterator<Item = Vec2> + '_ {
        (1..=RADIAL_SAMPLES).flat_map(move |r| {
            let radius = self.range * r as f32 / RADIAL_SAMPLES as f32;
            (0..ANGULAR_SAMPLES).map(move |a| {
                let t = a as f32 / (ANGULAR_SAMPLES - 1) as f32;
                let angle = self.facing_angle - self.half_width + t * 2.0 * self.half_width;
                self.origin + Vec2::new(angle.cos(), angle.sin()) * radius
            })
        })
    }
}
