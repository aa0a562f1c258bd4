//! Outward signals of a mob: animation intent for rendering, sound cues and
//! state-change notifications. The core never draws or plays anything.

use crate::ai::{AIState, DEATH_GRACE, HURT_DURATION};

/// Audio category, fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCategory {
    Attack,
    Hurt,
    Death,
}

/// Something the owning collaborator may want to react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MobEvent {
    StateChanged { from: AIState, to: AIState },
    Sound(SoundCategory),
}

/// Read-only animation signal for the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationIntent {
    pub state: AIState,
    pub clip: &'static str,
    pub facing_right: bool,
    /// Blink while invincible
    pub flash: bool,
    /// 0..1 through HURT, 0 otherwise
    pub hurt_progress: f32,
    /// 0..1 through the death grace period, 0 otherwise
    pub death_progress: f32,
    /// Tint of the most recent status effect
    pub tint: Option<[f32; 4]>,
}

impl Default for AnimationIntent {
    fn default() -> Self {
        Self {
            state: AIState::Idle,
            clip: "idle",
            facing_right: true,
            flash: false,
            hurt_progress: 0.0,
            death_progress: 0.0,
            tint: None,
        }
    }
}

impl AnimationIntent {
    pub(crate) fn progress(state: AIState, state_timer: f32) -> (f32, f32) {
        match state {
            AIState::Hurt => ((state_timer / HURT_DURATION).clamp(0.0, 1.0), 0.0),
            AIState::Dead => (0.0, (state_timer / DEATH_GRACE).clamp(0.0, 1.0)),
            _ => (0.0, 0.0),
        }
    }
}
