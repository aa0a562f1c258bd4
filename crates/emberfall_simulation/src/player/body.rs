//! Player body
//!
//! Тот же physics / invincibility / status стек, что и у мобов, чтобы
//! враждебные удары и projectiles имели цель. Input translation снаружи:
//! collaborator пишет `move_intent` / `request_jump()`.

use bevy::prelude::*;

use crate::combat::{DamageOutcome, Invincibility, StatusEffect, StatusEffects};
use crate::components::Health;
use crate::entity::{Combatant, Faction};
use crate::geometry::Bounds;
use crate::physics::{Hitbox, KinematicBody, PhysicsConfig};

/// Input is ignored for this long after a landed hit (seconds).
pub const HIT_STAGGER: f32 = 0.25;

/// Marker: entity управляется игроком, а не AI
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// What happened to the player during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerTickReport {
    pub status_damage: f32,
    /// Died this tick (status effects)
    pub died: bool,
}

#[derive(Component, Debug, Clone)]
#[require(Player)]
pub struct PlayerBody {
    body: KinematicBody,
    health: Health,
    facing_right: bool,
    invincibility: Invincibility,
    status: StatusEffects,
    stagger: f32,
    /// -1..1, horizontal input
    pub move_intent: f32,
    jump_requested: bool,
    /// px/s
    pub move_speed: f32,
    /// px/s (upward)
    pub jump_speed: f32,
}

impl PlayerBody {
    pub fn new(position: Vec2) -> Self {
        Self {
            body: KinematicBody::new(position, Hitbox::new(24.0, 48.0)),
            health: Health::new(100.0),
            facing_right: true,
            invincibility: Invincibility::new(0.8),
            status: StatusEffects::default(),
            stagger: 0.0,
            move_intent: 0.0,
            jump_requested: false,
            move_speed: 200.0,
            jump_speed: 450.0,
        }
    }

    pub fn with_health(mut self, max: f32) -> Self {
        self.health = Health::new(max);
        self
    }

    pub fn with_invincibility(mut self, duration: f32) -> Self {
        self.invincibility = Invincibility::new(duration);
        self
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }

    pub fn invincibility(&self) -> &Invincibility {
        &self.invincibility
    }

    pub fn status_effects(&self) -> &StatusEffects {
        &self.status
    }

    /// Jump on the next tick if grounded.
    pub fn request_jump(&mut self) {
        self.jump_requested = true;
    }

    /// Advances timers, status effects, input and physics.
    pub fn update<I>(&mut self, dt: f32, blocks: I, physics: &PhysicsConfig) -> PlayerTickReport
    where
        I: IntoIterator<Item = Bounds>,
    {
        let mut report = PlayerTickReport::default();
        self.invincibility.tick(dt);
        self.stagger = (self.stagger - dt).max(0.0);

        if !self.health.is_alive() {
            self.body.velocity.x = 0.0;
            self.jump_requested = false;
            self.body.step(dt, blocks, physics);
            return report;
        }

        report.status_damage = self.status.tick(dt);
        if report.status_damage > 0.0 {
            self.health.take_damage(report.status_damage);
            if !self.health.is_alive() {
                self.status.clear();
                report.died = true;
            }
        }

        if self.stagger <= 0.0 && self.health.is_alive() {
            let intent = self.move_intent.clamp(-1.0, 1.0);
            self.body.velocity.x = intent * self.move_speed * self.status.speed_multiplier();
            if intent != 0.0 {
                self.facing_right = intent > 0.0;
            }
        }

        if self.jump_requested && self.body.grounded {
            self.body.velocity.y = -self.jump_speed;
            self.body.grounded = false;
        }
        self.jump_requested = false;

        self.body.step(dt, blocks, physics);
        report
    }
}

impl Combatant for PlayerBody {
    fn bounds(&self) -> Bounds {
        self.body.bounds()
    }

    fn position(&self) -> Vec2 {
        self.body.position
    }

    fn is_facing_right(&self) -> bool {
        self.facing_right
    }

    fn take_damage(&mut self, amount: f32, knockback: Vec2) -> DamageOutcome {
        if !self.health.is_alive() || self.invincibility.is_active() {
            return DamageOutcome::Ignored;
        }

        self.health.take_damage(amount);
        self.invincibility.start();
        self.stagger = HIT_STAGGER;
        self.body.velocity += knockback;

        if self.health.is_alive() {
            DamageOutcome::Hurt
        } else {
            self.status.clear();
            DamageOutcome::Killed
        }
    }

    fn apply_status(&mut self, effect: StatusEffect) {
        if self.health.is_alive() {
            self.status.apply(effect);
        }
    }

    fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    fn faction(&self) -> Faction {
        Faction::Player
    }
}
