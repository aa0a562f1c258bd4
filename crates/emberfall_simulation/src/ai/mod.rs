//! AI decision-making module
//!
//! Per-mob FSM (IDLE/WANDER/CHASE/ATTACK/FLEE/HURT/DEAD). Решения чистые:
//! `decide_transition` читает StateMachine + Perception и возвращает новый
//! state, side effects входа в state выполняет владелец (Mob).

pub mod fsm;
pub mod targeting;
pub mod wander;


// Re-export основных типов
pub use fsm::{
    decide_transition, AIConfig, AIState, Perception, StateMachine, ATTACK_DURATION,
    ATTACK_STRIKE_TIME, DEATH_GRACE, FLEE_DURATION, HURT_DURATION, TIMER_EPSILON,
};
pub use targeting::{direction_to, edge_distance, face_distance, refresh_target, TargetLock};
pub use wander::{WanderBounds, WANDER_ARRIVAL_RADIUS};
