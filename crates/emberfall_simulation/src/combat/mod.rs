//! Combat resolution module
//!
//! Core (plain Rust, no ECS access):
//! - damage: формула урона, crit, PendingHit, события
//! - hitbox: melee arc hit-test
//! - weapon_stats: параметры melee оружия
//! - status: burning / frozen / poisoned
//! - invincibility: i-frames после дискретного удара
//! - projectile: полет, piercing, explosions
//!
//! ECS (systems): CombatPlugin применяет накопленные за тик PendingHit'ы,
//! двигает projectiles и убирает отработавшие.

pub mod damage;
pub mod hitbox;
pub mod invincibility;
pub mod projectile;
pub mod status;
pub mod systems;
pub mod weapon_stats;

#[cfg(test)]
mod projectile_tests;

// Re-export основных типов
pub use damage::{
    calculate_damage, charge_multiplier, roll_crit, DamageDealt, DamageOutcome, EntityDied,
    PendingHit,
};
pub use hitbox::{arc_half_width_for_attack_speed, MeleeArc};
pub use invincibility::Invincibility;
pub use projectile::{Projectile, ProjectileKind, ProjectileSpec, ProjectileStep};
pub use status::{StatusEffect, StatusEffectKind, StatusEffects};
pub use systems::{CombatPlugin, PendingHits, PendingProjectiles};
pub use weapon_stats::WeaponStats;
