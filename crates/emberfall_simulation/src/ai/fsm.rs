//! FSM AI: states, config, transition rules.
//!
//! Правила проверяются каждый тик после обновления таймеров, первое
//! совпадение выигрывает. HURT и DEAD проверяются первыми и не
//! прерываются остальными правилами.

use bevy::prelude::*;

/// HURT → previous state (seconds)
pub const HURT_DURATION: f32 = 0.3;
/// Moment inside ATTACK when the strike resolves
pub const ATTACK_STRIKE_TIME: f32 = 0.3;
/// ATTACK → CHASE
pub const ATTACK_DURATION: f32 = 0.5;
/// FLEE → WANDER
pub const FLEE_DURATION: f32 = 3.0;
/// DEAD must persist this long before the mob reports `is_dead()`
pub const DEATH_GRACE: f32 = 1.0;

/// Timer comparisons tolerate accumulated fixed-step rounding.
pub const TIMER_EPSILON: f32 = 1e-4;

/// AI FSM состояния
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum AIState {
    /// Idle: стоим на месте
    #[default]
    Idle,
    /// Wander: ходим внутри wander bounds
    Wander,
    /// Chase: бежим к цели
    Chase,
    /// Attack: замах (0.3s) → удар → recovery (до 0.5s)
    Attack,
    /// Flee: убегаем от цели
    Flee,
    /// Hurt: stagger после удара
    Hurt,
    /// Dead: терминальное
    Dead,
}

impl AIState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AIState::Idle => "IDLE",
            AIState::Wander => "WANDER",
            AIState::Chase => "CHASE",
            AIState::Attack => "ATTACK",
            AIState::Flee => "FLEE",
            AIState::Hurt => "HURT",
            AIState::Dead => "DEAD",
        }
    }

    /// States where the mob is already closing in on its target.
    pub fn is_engaged(&self) -> bool {
        matches!(self, AIState::Chase | AIState::Attack)
    }
}

/// Параметры AI
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct AIConfig {
    /// Edge distance that starts a chase (px)
    pub detection_range: f32,
    /// Edge distance that allows an attack (px)
    pub attack_range: f32,
    /// Chase is dropped beyond this edge distance (px)
    pub lose_target_range: f32,
    /// Half-width of the wander bounds (px)
    pub wander_range: f32,
    /// px/s
    pub wander_speed: f32,
    /// px/s
    pub chase_speed: f32,
    /// px/s
    pub flee_speed: f32,
    /// IDLE → WANDER (seconds)
    pub idle_duration: f32,
    /// WANDER → IDLE (seconds)
    pub wander_duration: f32,
    /// Health fraction below which HURT ends in FLEE (0 = never flees)
    pub flee_health_fraction: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            detection_range: 300.0,
            attack_range: 50.0,
            lose_target_range: 450.0,
            wander_range: 150.0,
            wander_speed: 60.0,
            chase_speed: 120.0,
            flee_speed: 150.0,
            idle_duration: 2.0,
            wander_duration: 4.0,
            flee_health_fraction: 0.0,
        }
    }
}

/// Current state + timer bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StateMachine {
    pub state: AIState,
    /// State to resume after HURT
    pub previous_state: AIState,
    /// Seconds since the last transition
    pub state_timer: f32,
    /// ATTACK already resolved its strike
    pub attack_fired: bool,
}

impl StateMachine {
    pub fn new(state: AIState) -> Self {
        Self {
            state,
            previous_state: state,
            ..Default::default()
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.state_timer += dt.max(0.0);
    }

    /// Switches state and restarts the timer.
    ///
    /// Re-entering HURT from HURT keeps the original resume state.
    pub fn transition_to(&mut self, next: AIState) {
        if !(self.state == AIState::Hurt && next == AIState::Hurt) {
            self.previous_state = self.state;
        }
        self.state = next;
        self.state_timer = 0.0;
        self.attack_fired = false;
    }

    pub fn elapsed(&self, duration: f32) -> bool {
        self.state_timer + TIMER_EPSILON >= duration
    }

    /// ATTACK reached the strike moment and hasn't struck yet.
    pub fn strike_due(&self) -> bool {
        self.state == AIState::Attack && !self.attack_fired && self.elapsed(ATTACK_STRIKE_TIME)
    }
}

/// What the mob knows about the world this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    /// Edge-aware distance to the target, `f32::MAX` without one
    pub target_distance: f32,
    pub has_target: bool,
    /// attack cooldown ≤ 0
    pub attack_ready: bool,
    pub health_fraction: f32,
    /// Within arrival radius of the wander target
    pub reached_wander_target: bool,
}

impl Default for Perception {
    fn default() -> Self {
        Self {
            target_distance: f32::MAX,
            has_target: false,
            attack_ready: true,
            health_fraction: 1.0,
            reached_wander_target: false,
        }
    }
}

/// Target present and health under the species' flee threshold.
fn wants_to_flee(config: &AIConfig, perception: &Perception) -> bool {
    perception.has_target
        && config.flee_health_fraction > 0.0
        && perception.health_fraction < config.flee_health_fraction
}

/// State to resume once HURT ends.
fn resume_state(machine: &StateMachine, config: &AIConfig, perception: &Perception) -> AIState {
    if wants_to_flee(config, perception) {
        return AIState::Flee;
    }
    match machine.previous_state {
        AIState::Hurt | AIState::Dead => AIState::Idle,
        other => other,
    }
}

/// Next state, or `None` to stay.
pub fn decide_transition(
    machine: &StateMachine,
    config: &AIConfig,
    perception: &Perception,
) -> Option<AIState> {
    let state = machine.state;
    match state {
        AIState::Dead => return None,
        AIState::Hurt => {
            return machine
                .elapsed(HURT_DURATION)
                .then(|| resume_state(machine, config, perception));
        }
        _ => {}
    }

    let distance = perception.target_distance;

    // FLEE держится, пока здоровье ниже порога
    let fleeing = state == AIState::Flee && wants_to_flee(config, perception);
    if perception.has_target
        && distance < config.detection_range
        && !state.is_engaged()
        && !fleeing
    {
        return Some(AIState::Chase);
    }

    if perception.has_target
        && distance < config.attack_range
        && perception.attack_ready
        && state == AIState::Chase
    {
        return Some(AIState::Attack);
    }

    if state == AIState::Chase && distance > config.lose_target_range {
        return Some(AIState::Wander);
    }

    match state {
        AIState::Idle if machine.elapsed(config.idle_duration) => Some(AIState::Wander),
        AIState::Wander
            if machine.elapsed(config.wander_duration) || perception.reached_wander_target =>
        {
            Some(AIState::Idle)
        }
        AIState::Attack if machine.elapsed(ATTACK_DURATION) => Some(AIState::Chase),
        AIState::Flee if machine.elapsed(FLEE_DURATION) => Some(AIState::Wander),
        _ => None,
    }
}
