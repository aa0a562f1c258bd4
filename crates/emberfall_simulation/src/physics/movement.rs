//! Kinematic body integrator
//!
//! Архитектура:
//! - gravity → vy (only while airborne)
//! - X resolved first at the current Y, then Y at the already-updated X
//! - horizontal contact rejects the whole X step (no sliding)
//! - vertical contact snaps onto / under the block
//! - no block below → flat ground plane at `ground_y`
//!
//! Velocities are px/s, so the step is frame-rate independent.

use bevy::math::Vec2;
use serde::Deserialize;

use crate::geometry::Bounds;

/// Overlap probes ignore this much of the moving box along the axis not being
/// resolved, so floor contact never blocks X and wall contact never blocks Y.
const CONTACT_EPSILON: f32 = 0.01;

/// How far below the feet we probe for a supporting block.
const SUPPORT_PROBE: f32 = 1.0;

/// World-level physics constants.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// px/s²
    pub gravity: f32,
    /// px/s, clamp for vy while falling
    pub max_fall_speed: f32,
    /// Y of the fallback floor plane
    pub ground_y: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 980.0,
            max_fall_speed: 900.0,
            ground_y: 600.0,
        }
    }
}

/// Collision box relative to the body position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub width: f32,
    pub height: f32,
    pub offset: Vec2,
}

impl Hitbox {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// World-space bounds for a body at `position`.
    pub fn at(&self, position: Vec2) -> Bounds {
        Bounds::new(
            position.x + self.offset.x,
            position.y + self.offset.y,
            self.width,
            self.height,
        )
    }
}

/// What happened during one `step`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionReport {
    pub hit_wall: bool,
    pub landed: bool,
    pub hit_ceiling: bool,
}

/// Position + velocity + hitbox of a simulated body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub hitbox: Hitbox,
    pub grounded: bool,
}

impl KinematicBody {
    pub fn new(position: Vec2, hitbox: Hitbox) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            hitbox,
            grounded: false,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.hitbox.at(self.position)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Advances the body by `dt` seconds against `blocks`.
    pub fn step<I>(&mut self, dt: f32, blocks: I, config: &PhysicsConfig) -> CollisionReport
    where
        I: IntoIterator<Item = Bounds>,
    {
        let blocks: Vec<Bounds> = blocks.into_iter().collect();
        let mut report = CollisionReport::default();

        if !self.grounded {
            self.velocity.y = (self.velocity.y + config.gravity * dt).min(config.max_fall_speed);
        }

        // X first, using the current Y. Only the feet are lifted: the floor we
        // stand on (or a lip lower than CONTACT_EPSILON) is not a wall, and
        // the Y pass below snaps the body on top of such a lip.
        if self.velocity.x != 0.0 {
            let new_x = self.position.x + self.velocity.x * dt;
            let moved = self.hitbox.at(Vec2::new(new_x, self.position.y));
            let probe = Bounds::new(
                moved.x,
                moved.y,
                moved.width,
                (moved.height - CONTACT_EPSILON).max(0.0),
            );
            if blocks.iter().any(|block| probe.intersects(block)) {
                self.velocity.x = 0.0;
                report.hit_wall = true;
            } else {
                self.position.x = new_x;
            }
        }

        // Y second, using the updated X. Shrinking horizontally ignores walls
        // we are pressed against.
        let new_y = self.position.y + self.velocity.y * dt;
        let probe = self
            .hitbox
            .at(Vec2::new(self.position.x, new_y))
            .shrunk(CONTACT_EPSILON, 0.0);
        let colliding: Vec<Bounds> = blocks
            .iter()
            .copied()
            .filter(|block| probe.intersects(block))
            .collect();

        if !colliding.is_empty() && self.velocity.y > 0.0 {
            let highest_top = colliding.iter().map(Bounds::top).fold(f32::INFINITY, f32::min);
            self.rest_on(highest_top);
            report.landed = true;
        } else if !colliding.is_empty() && self.velocity.y < 0.0 {
            let lowest_bottom = colliding
                .iter()
                .map(Bounds::bottom)
                .fold(f32::NEG_INFINITY, f32::max);
            self.position.y = lowest_bottom - self.hitbox.offset.y;
            self.velocity.y = 0.0;
            self.grounded = false;
            report.hit_ceiling = true;
        } else {
            self.position.y = new_y;
            if let Some(top) = self.support_top(&blocks) {
                report.landed = !self.grounded;
                self.rest_on(top);
            } else {
                self.grounded = false;
                self.settle_on_ground_plane(config, &mut report);
            }
        }

        report
    }

    fn rest_on(&mut self, surface_y: f32) {
        self.position.y = surface_y - self.hitbox.offset.y - self.hitbox.height;
        self.velocity.y = 0.0;
        self.grounded = true;
    }

    /// Top of the block directly under the feet, if any.
    fn support_top(&self, blocks: &[Bounds]) -> Option<f32> {
        if self.velocity.y < 0.0 {
            return None;
        }
        let bounds = self.bounds();
        let feet = bounds
            .shrunk(CONTACT_EPSILON, 0.0)
            .translated(Vec2::new(0.0, SUPPORT_PROBE));
        blocks
            .iter()
            .filter(|block| block.top() >= bounds.bottom() - SUPPORT_PROBE && feet.intersects(block))
            .map(Bounds::top)
            .reduce(f32::min)
    }

    fn settle_on_ground_plane(&mut self, config: &PhysicsConfig, report: &mut CollisionReport) {
        let bottom = self.bounds().bottom();
        if bottom >= config.ground_y - CONTACT_EPSILON && self.velocity.y >= 0.0 {
            report.landed = self.velocity.y > 0.0;
            self.rest_on(config.ground_y);
        }
    }
}
