//! Physics simulation module
//!
//! Kinematic bodies with gravity and axis-separated block collision.
//! No rigid-body solver: velocities are integrated by hand every fixed tick.

pub mod movement;


pub use movement::{CollisionReport, Hitbox, KinematicBody, PhysicsConfig};
