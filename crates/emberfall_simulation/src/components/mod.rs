//! ECS Components, общие для мобов и игрока
//!
//! - actor: здоровье (Health)

pub mod actor;

pub use actor::*;
