//! Damage calculation
//!
//! Формула:
//! final = base × weapon_multiplier × charge_multiplier × crit_multiplier
//!
//! - charge: 1.0 (no hold) → 3.0 (5s hold), linear
//! - crit: rolled per hit against the weapon crit chance

use bevy::prelude::*;
use rand::Rng;

use crate::combat::StatusEffect;

/// Hold time that reaches the maximum charge multiplier (seconds).
pub const MAX_CHARGE_SECONDS: f32 = 5.0;

/// Charge multiplier at full hold.
pub const MAX_CHARGE_MULTIPLIER: f32 = 3.0;

/// Result of a discrete hit on a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invincible or already dead, nothing changed
    Ignored,
    /// Took damage and survived
    Hurt,
    /// This hit killed the target
    Killed,
}

impl DamageOutcome {
    pub fn landed(&self) -> bool {
        !matches!(self, DamageOutcome::Ignored)
    }
}

/// Charge multiplier for a hold of `hold_seconds` (clamped to [0, 5]).
pub fn charge_multiplier(hold_seconds: f32) -> f32 {
    let hold = hold_seconds.clamp(0.0, MAX_CHARGE_SECONDS);
    1.0 + (MAX_CHARGE_MULTIPLIER - 1.0) * hold / MAX_CHARGE_SECONDS
}

/// Вычисляет final damage (before crit roll).
pub fn calculate_damage(
    base_damage: f32,
    weapon_multiplier: f32,
    charge_multiplier: f32,
    crit_multiplier: f32,
) -> f32 {
    (base_damage * weapon_multiplier * charge_multiplier * crit_multiplier).max(0.0)
}

/// Rolls a crit against `chance` (0..=1).
pub fn roll_crit(rng: &mut impl Rng, chance: f32) -> bool {
    if chance.is_nan() || chance <= 0.0 {
        return false;
    }
    rng.gen_bool(chance.min(1.0) as f64)
}

/// A hit produced during a tick, applied to its target after every mob ran.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingHit {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub damage: f32,
    pub knockback: Vec2,
    pub status: Option<StatusEffect>,
    pub is_crit: bool,
}

impl PendingHit {
    pub fn new(attacker: Option<Entity>, target: Entity, damage: f32, knockback: Vec2) -> Self {
        Self {
            attacker,
            target,
            damage,
            knockback,
            status: None,
            is_crit: false,
        }
    }

    pub fn with_status(mut self, status: Option<StatusEffect>) -> Self {
        self.status = status;
        self
    }

    pub fn with_crit(mut self, is_crit: bool) -> Self {
        self.is_crit = is_crit;
        self
    }

    /// Damage after the attached effect's impact multiplier.
    pub fn effective_damage(&self) -> f32 {
        let multiplier = self
            .status
            .map(|status| status.impact_multiplier)
            .unwrap_or(1.0);
        self.damage * multiplier
    }
}

/// Событие: урон нанесен
///
/// Генерируется после применения PendingHit к цели.
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub damage: f32,
    pub is_crit: bool,
    pub target_died: bool,
}

/// Событие: entity умер (health <= 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}
