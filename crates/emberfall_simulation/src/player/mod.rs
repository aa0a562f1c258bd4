//! Player module
//!
//! - body: PlayerBody (combatant для мобов)
//! - systems: PlayerPlugin

pub mod body;
pub mod systems;

pub use body::{Player, PlayerBody, PlayerTickReport, HIT_STAGGER};
pub use systems::PlayerPlugin;
