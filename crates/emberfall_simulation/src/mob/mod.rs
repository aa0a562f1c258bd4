//! Mob module
//!
//! - controller: Mob (FSM + physics + combat wiring)
//! - species: closed set of species strategies
//! - spawn: spawn records, overrides, validation
//! - intent: animation / sound signals for outer collaborators
//! - systems: MobPlugin (ECS scheduling)

pub mod controller;
pub mod intent;
pub mod spawn;
pub mod species;
pub mod systems;

#[cfg(test)]
mod controller_tests;

pub use controller::{Mob, MobTickOutput};
pub use intent::{AnimationIntent, MobEvent, SoundCategory};
pub use spawn::{MobStats, SpawnError, SpawnRecord, StatOverrides};
pub use species::{AttackStyle, PresentationProfile, Species};
pub use systems::{MobPlugin, MobSoundEvent};
