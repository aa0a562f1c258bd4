//! Spawn records and stat validation.
//!
//! Level data is parsed elsewhere; the core only sees `SpawnRecord`s.
//! Malformed configuration is the one fatal case and is rejected here,
//! before a mob exists.

use bevy::math::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::ai::AIConfig;
use crate::mob::species::{AttackStyle, Species};
use crate::physics::Hitbox;

/// Spawn construction errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpawnError {
    #[error("unknown mob species '{0}'")]
    UnknownSpecies(String),

    #[error("max health must be a positive finite number, got {0}")]
    InvalidMaxHealth(f32),

    #[error("{name} must be a non-negative finite distance, got {value}")]
    InvalidRange { name: &'static str, value: f32 },

    #[error("hitbox must have positive finite size, got {width}x{height}")]
    InvalidHitbox { width: f32, height: f32 },

    #[error("{name} must be a non-negative finite speed, got {value}")]
    InvalidSpeed { name: &'static str, value: f32 },

    #[error("lose-target range {lose_target} is smaller than detection range {detection}")]
    InvertedRanges { detection: f32, lose_target: f32 },

    #[error("spawn position ({x}, {y}) is not finite")]
    InvalidPosition { x: f32, y: f32 },
}

/// Optional per-spawn overrides of species defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatOverrides {
    pub max_health: Option<f32>,
    pub detection_range: Option<f32>,
    pub attack_range: Option<f32>,
    pub lose_target_range: Option<f32>,
    pub wander_range: Option<f32>,
    pub wander_speed: Option<f32>,
    pub chase_speed: Option<f32>,
    pub flee_speed: Option<f32>,
    pub hitbox_width: Option<f32>,
    pub hitbox_height: Option<f32>,
    pub invincibility_duration: Option<f32>,
}

/// One mob entry of the level data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpawnRecord {
    /// Species id ("zombie", "skeleton", ...)
    #[serde(alias = "type")]
    pub species: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub overrides: StatOverrides,
}

impl SpawnRecord {
    pub fn new(species: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            species: species.into(),
            x,
            y,
            overrides: StatOverrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: StatOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Species, validated stats and spawn position.
    pub fn resolve(&self) -> Result<(Species, MobStats, Vec2), SpawnError> {
        let species: Species = self.species.parse()?;
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(SpawnError::InvalidPosition {
                x: self.x,
                y: self.y,
            });
        }
        let stats = species.default_stats().with_overrides(&self.overrides);
        stats.validate()?;
        // Wander bounds = x ± wander_range
        let half = stats.ai.wander_range;
        if !(self.x - half).is_finite() || !(self.x + half).is_finite() {
            return Err(SpawnError::InvalidRange {
                name: "wander_range",
                value: half,
            });
        }
        Ok((species, stats, Vec2::new(self.x, self.y)))
    }
}

/// Resolved stat block of one mob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MobStats {
    pub max_health: f32,
    pub hitbox: Hitbox,
    pub ai: AIConfig,
    pub attack: AttackStyle,
    /// Окно неуязвимости после удара (секунды)
    pub invincibility_duration: f32,
}

impl MobStats {
    pub fn with_overrides(mut self, overrides: &StatOverrides) -> Self {
        fn set(slot: &mut f32, value: Option<f32>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut self.max_health, overrides.max_health);
        set(&mut self.ai.detection_range, overrides.detection_range);
        set(&mut self.ai.attack_range, overrides.attack_range);
        set(&mut self.ai.lose_target_range, overrides.lose_target_range);
        set(&mut self.ai.wander_range, overrides.wander_range);
        set(&mut self.ai.wander_speed, overrides.wander_speed);
        set(&mut self.ai.chase_speed, overrides.chase_speed);
        set(&mut self.ai.flee_speed, overrides.flee_speed);
        set(&mut self.hitbox.width, overrides.hitbox_width);
        set(&mut self.hitbox.height, overrides.hitbox_height);
        set(&mut self.invincibility_duration, overrides.invincibility_duration);
        self
    }

    pub fn validate(&self) -> Result<(), SpawnError> {
        if !self.max_health.is_finite() || self.max_health <= 0.0 {
            return Err(SpawnError::InvalidMaxHealth(self.max_health));
        }

        let Hitbox { width, height, .. } = self.hitbox;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SpawnError::InvalidHitbox { width, height });
        }

        let ranges = [
            ("detection_range", self.ai.detection_range),
            ("attack_range", self.ai.attack_range),
            ("lose_target_range", self.ai.lose_target_range),
            ("wander_range", self.ai.wander_range),
            ("invincibility_duration", self.invincibility_duration),
        ];
        for (name, value) in ranges {
            if !value.is_finite() || value < 0.0 {
                return Err(SpawnError::InvalidRange { name, value });
            }
        }

        // Ширина wander bounds (2 × range) тоже должна быть конечной
        if !(self.ai.wander_range * 2.0).is_finite() {
            return Err(SpawnError::InvalidRange {
                name: "wander_range",
                value: self.ai.wander_range,
            });
        }

        let speeds = [
            ("wander_speed", self.ai.wander_speed),
            ("chase_speed", self.ai.chase_speed),
            ("flee_speed", self.ai.flee_speed),
        ];
        for (name, value) in speeds {
            if !value.is_finite() || value < 0.0 {
                return Err(SpawnError::InvalidSpeed { name, value });
            }
        }

        if self.ai.lose_target_range < self.ai.detection_range {
            return Err(SpawnError::InvertedRanges {
                detection: self.ai.detection_range,
                lose_target: self.ai.lose_target_range,
            });
        }

        Ok(())
    }
}
