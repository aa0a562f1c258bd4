//! Mob controller (composition root)
//!
//! Порядок внутри `update`:
//! timers → (DEAD: только death timer) → status ticks → target refresh →
//! AI transition + steering → physics → strike resolution → animation intent
//!
//! Мob меняет только свои поля. Удары по другим entity и новые projectiles
//! возвращаются наружу (MobTickOutput) и применяются владельцем списка.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{
    decide_transition, direction_to, edge_distance, refresh_target, AIState, Perception,
    StateMachine, TargetLock, WanderBounds, DEATH_GRACE, WANDER_ARRIVAL_RADIUS,
};
use crate::combat::{
    DamageOutcome, Invincibility, PendingHit, Projectile, StatusEffect, StatusEffects,
};
use crate::components::Health;
use crate::entity::{Combatant, Faction, WorldSnapshot};
use crate::geometry::Bounds;
use crate::mob::intent::{AnimationIntent, MobEvent, SoundCategory};
use crate::mob::spawn::{MobStats, SpawnError, SpawnRecord};
use crate::mob::species::{AttackStyle, Species};
use crate::physics::{KinematicBody, PhysicsConfig};

/// Horizontal deceleration while staggered (px/s²).
const HURT_DECELERATION: f32 = 600.0;

/// What a mob wants done to the rest of the world this tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MobTickOutput {
    pub hits: Vec<PendingHit>,
    pub projectiles: Vec<Projectile>,
}

impl MobTickOutput {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty() && self.projectiles.is_empty()
    }
}

/// Dynamic combatant driven by the FSM.
///
/// Инварианты:
/// - 0 ≤ health ≤ max
/// - DEAD терминален, DEAD ⇒ health == 0
#[derive(Component, Debug, Clone)]
pub struct Mob {
    species: Species,
    stats: MobStats,
    faction: Faction,
    body: KinematicBody,
    physics: PhysicsConfig,
    facing_right: bool,
    health: Health,
    fsm: StateMachine,
    /// Cooldown до следующей атаки, ≥ 0
    attack_timer: f32,
    invincibility: Invincibility,
    status: StatusEffects,
    wander: WanderBounds,
    wander_target: Option<f32>,
    /// Non-owning handle, revalidated every tick
    target: Option<Entity>,
    /// Own ECS id, used as projectile owner and hit-test exclusion
    entity: Option<Entity>,
    intent: AnimationIntent,
    events: Vec<MobEvent>,
}

impl Mob {
    /// Mob with species defaults at `position`.
    pub fn new(species: Species, position: Vec2) -> Self {
        Self::with_stats(species, species.default_stats(), position)
    }

    /// Mob with an already validated stat block.
    pub fn with_stats(species: Species, stats: MobStats, position: Vec2) -> Self {
        let body = KinematicBody::new(position, stats.hitbox);
        let center_x = body.center().x;
        let mut mob = Self {
            species,
            stats,
            faction: Faction::Hostile,
            body,
            physics: PhysicsConfig::default(),
            facing_right: true,
            health: Health::new(stats.max_health),
            fsm: StateMachine::new(AIState::Idle),
            attack_timer: 0.0,
            invincibility: Invincibility::new(stats.invincibility_duration),
            status: StatusEffects::default(),
            wander: WanderBounds::around(center_x, stats.ai.wander_range),
            wander_target: None,
            target: None,
            entity: None,
            intent: AnimationIntent::default(),
            events: Vec::new(),
        };
        mob.refresh_intent();
        mob
    }

    /// Validates a level spawn record and builds the mob.
    pub fn from_spawn(record: &SpawnRecord) -> Result<Self, SpawnError> {
        let (species, stats, position) = record.resolve()?;
        Ok(Self::with_stats(species, stats, position))
    }

    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    pub fn set_physics(&mut self, physics: PhysicsConfig) {
        self.physics = physics;
    }

    /// Binds the ECS id this mob lives under.
    pub fn bind_entity(&mut self, entity: Entity) {
        self.entity = Some(entity);
    }

    pub fn entity(&self) -> Option<Entity> {
        self.entity
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn stats(&self) -> &MobStats {
        &self.stats
    }

    pub fn state(&self) -> AIState {
        self.fsm.state
    }

    pub fn state_machine(&self) -> &StateMachine {
        &self.fsm
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    /// Direct body access for placement and scripted pushes.
    pub fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    pub fn attack_timer(&self) -> f32 {
        self.attack_timer
    }

    pub fn invincibility(&self) -> &Invincibility {
        &self.invincibility
    }

    pub fn status_effects(&self) -> &StatusEffects {
        &self.status
    }

    pub fn wander_bounds(&self) -> &WanderBounds {
        &self.wander
    }

    pub fn set_wander_bounds(&mut self, bounds: WanderBounds) {
        self.wander = bounds;
    }

    pub fn wander_target(&self) -> Option<f32> {
        self.wander_target
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn animation_intent(&self) -> &AnimationIntent {
        &self.intent
    }

    /// Takes the events accumulated since the last drain.
    pub fn drain_events(&mut self) -> Vec<MobEvent> {
        std::mem::take(&mut self.events)
    }

    /// DEAD persisted beyond the death grace period; the owner may remove it.
    pub fn is_dead(&self) -> bool {
        self.fsm.state == AIState::Dead && self.fsm.state_timer > DEATH_GRACE
    }

    /// Advances the mob by `dt` seconds against the shared snapshot.
    pub fn update(
        &mut self,
        dt: f32,
        snapshot: &WorldSnapshot,
        rng: &mut impl Rng,
    ) -> MobTickOutput {
        let mut output = MobTickOutput::default();

        // 1. Timers
        self.fsm.tick(dt);
        self.attack_timer = (self.attack_timer - dt).max(0.0);
        self.invincibility.tick(dt);

        if self.fsm.state == AIState::Dead {
            self.body.velocity = Vec2::ZERO;
            self.refresh_intent();
            return output;
        }

        let status_damage = self.status.tick(dt);
        if status_damage > 0.0 {
            self.health.take_damage(status_damage);
            if !self.health.is_alive() {
                self.die();
                self.refresh_intent();
                return output;
            }
        }

        // 2. Target
        let lock = refresh_target(self.target, snapshot);
        self.target = lock.map(|lock| lock.entity);

        // 3. AI
        let center = self.body.center();
        if matches!(self.fsm.state, AIState::Idle | AIState::Wander) {
            if let Some(corrected) = self.wander.drift_correction(center.x) {
                self.wander_target = Some(corrected);
            }
        }

        let perception = Perception {
            target_distance: edge_distance(center, lock.as_ref().map(|lock| &lock.bounds)),
            has_target: lock.is_some(),
            attack_ready: self.attack_timer <= 0.0,
            health_fraction: self.health.fraction(),
            reached_wander_target: self.fsm.state == AIState::Wander
                && self
                    .wander_target
                    .is_some_and(|x| (x - center.x).abs() <= WANDER_ARRIVAL_RADIUS),
        };
        if let Some(next) = decide_transition(&self.fsm, &self.stats.ai, &perception) {
            let resumed = self.fsm.state == AIState::Hurt;
            self.change_state(next, resumed, lock.as_ref());
            if next == AIState::Wander && !resumed {
                self.begin_wander(rng);
            }
        }
        self.steer(dt, lock.as_ref());

        // 4. Physics
        self.body.step(dt, snapshot.solid_blocks(), &self.physics);

        // 5. Strike
        if self.fsm.strike_due() {
            self.fsm.attack_fired = true;
            self.attack_timer = self.stats.attack.cooldown();
            self.perform_attack(snapshot, lock.as_ref(), rng, &mut output);
        }

        // 6. Intent
        self.refresh_intent();
        output
    }

    /// Switches state and runs entry side effects. WANDER entry also needs
    /// `begin_wander`, which the caller runs with its RNG.
    fn change_state(&mut self, next: AIState, resumed: bool, lock: Option<&TargetLock>) {
        let from = self.fsm.state;
        self.fsm.transition_to(next);
        self.events.push(MobEvent::StateChanged { from, to: next });

        // Resuming a calm state after a stagger keeps its bounds and target
        if resumed && matches!(next, AIState::Idle | AIState::Wander) {
            return;
        }

        let center = self.body.center();
        match next {
            AIState::Idle => {
                self.body.velocity.x = 0.0;
            }
            AIState::Wander => {}
            AIState::Chase => {
                if let Some(lock) = lock {
                    let direction = direction_to(center, &lock.bounds);
                    self.facing_right = direction > 0.0;
                    self.body.velocity.x = direction * self.move_speed(self.stats.ai.chase_speed);
                }
            }
            AIState::Attack => {
                if let Some(lock) = lock {
                    self.facing_right = direction_to(center, &lock.bounds) > 0.0;
                }
                self.body.velocity.x = 0.0;
                self.events.push(MobEvent::Sound(SoundCategory::Attack));
            }
            AIState::Flee => {
                if let Some(lock) = lock {
                    let away = -direction_to(center, &lock.bounds);
                    self.facing_right = away > 0.0;
                    self.body.velocity.x = away * self.move_speed(self.stats.ai.flee_speed);
                }
            }
            AIState::Hurt => {
                self.events.push(MobEvent::Sound(SoundCategory::Hurt));
            }
            AIState::Dead => {
                self.body.velocity = Vec2::ZERO;
                self.events.push(MobEvent::Sound(SoundCategory::Death));
            }
        }
    }

    /// Recentres the wander bounds on the mob and picks a fresh target.
    fn begin_wander(&mut self, rng: &mut impl Rng) {
        let x = self.body.center().x;
        self.wander.recentre(x);
        self.wander_target = Some(self.wander.pick_target(x, self.facing_right, rng));
    }

    /// Per-tick horizontal velocity for the current state.
    fn steer(&mut self, dt: f32, lock: Option<&TargetLock>) {
        let center = self.body.center();
        let ai = self.stats.ai;
        match self.fsm.state {
            AIState::Idle | AIState::Attack => {
                self.body.velocity.x = 0.0;
            }
            AIState::Wander => {
                let Some(target_x) = self.wander_target else {
                    self.body.velocity.x = 0.0;
                    return;
                };
                let dx = target_x - center.x;
                if dx.abs() <= WANDER_ARRIVAL_RADIUS {
                    self.body.velocity.x = 0.0;
                } else {
                    self.facing_right = dx > 0.0;
                    self.body.velocity.x = dx.signum() * self.move_speed(ai.wander_speed);
                }
            }
            AIState::Chase => {
                let Some(lock) = lock else {
                    self.body.velocity.x = 0.0;
                    return;
                };
                let direction = direction_to(center, &lock.bounds);
                self.facing_right = direction > 0.0;
                // Stop at reach instead of shoving into the target
                if edge_distance(center, Some(&lock.bounds)) < ai.attack_range {
                    self.body.velocity.x = 0.0;
                } else {
                    self.body.velocity.x = direction * self.move_speed(ai.chase_speed);
                }
            }
            AIState::Flee => {
                if let Some(lock) = lock {
                    let away = -direction_to(center, &lock.bounds);
                    self.facing_right = away > 0.0;
                    self.body.velocity.x = away * self.move_speed(ai.flee_speed);
                }
            }
            AIState::Hurt => {
                let vx = self.body.velocity.x;
                let decel = HURT_DECELERATION * dt;
                self.body.velocity.x = if vx.abs() <= decel {
                    0.0
                } else {
                    vx - decel * vx.signum()
                };
            }
            AIState::Dead => {
                self.body.velocity = Vec2::ZERO;
            }
        }
    }

    fn move_speed(&self, base: f32) -> f32 {
        base * self.status.speed_multiplier()
    }

    fn perform_attack(
        &mut self,
        snapshot: &WorldSnapshot,
        lock: Option<&TargetLock>,
        rng: &mut impl Rng,
        output: &mut MobTickOutput,
    ) {
        let center = self.body.center();
        match self.stats.attack {
            AttackStyle::Melee(weapon) => {
                let arc = weapon.arc(center, self.facing_right);
                for view in snapshot.hittable_by(self.faction, self.entity) {
                    if !arc.hits(&view.bounds) {
                        continue;
                    }
                    let (damage, is_crit) = weapon.roll_damage(0.0, rng);
                    output.hits.push(
                        PendingHit::new(
                            self.entity,
                            view.entity,
                            damage,
                            weapon.knockback_toward(self.facing_right),
                        )
                        .with_status(weapon.on_hit)
                        .with_crit(is_crit),
                    );
                }
            }
            AttackStyle::Ranged { kind, .. } => {
                let fallback = Vec2::new(if self.facing_right { 1.0 } else { -1.0 }, 0.0);
                let direction = lock
                    .map(|lock| lock.bounds.face_point_toward(center) - center)
                    .and_then(|aim| aim.try_normalize())
                    .unwrap_or(fallback);
                output.projectiles.push(Projectile::launch(
                    kind,
                    center,
                    direction,
                    self.faction,
                    self.entity,
                ));
            }
        }
    }

    fn die(&mut self) {
        self.health.deplete();
        self.status.clear();
        self.change_state(AIState::Dead, false, None);
    }

    fn refresh_intent(&mut self) {
        let (hurt_progress, death_progress) =
            AnimationIntent::progress(self.fsm.state, self.fsm.state_timer);
        self.intent = AnimationIntent {
            state: self.fsm.state,
            clip: self.species.presentation().clip_for(self.fsm.state),
            facing_right: self.facing_right,
            flash: self.invincibility.flash_visible(),
            hurt_progress,
            death_progress,
            tint: self.status.tint(),
        };
    }
}

impl Combatant for Mob {
    fn bounds(&self) -> Bounds {
        self.body.bounds()
    }

    fn position(&self) -> Vec2 {
        self.body.position
    }

    fn is_facing_right(&self) -> bool {
        self.facing_right
    }

    /// Ignored while invincible or DEAD. A killing blow enters DEAD (which
    /// zeroes velocity) and the knockback is added on top of that.
    fn take_damage(&mut self, amount: f32, knockback: Vec2) -> DamageOutcome {
        if self.fsm.state == AIState::Dead || self.invincibility.is_active() {
            return DamageOutcome::Ignored;
        }

        self.health.take_damage(amount);
        self.invincibility.start();

        let outcome = if self.health.is_alive() {
            self.change_state(AIState::Hurt, false, None);
            DamageOutcome::Hurt
        } else {
            self.die();
            DamageOutcome::Killed
        };
        self.body.velocity += knockback;
        self.refresh_intent();
        outcome
    }

    fn apply_status(&mut self, effect: StatusEffect) {
        if self.fsm.state != AIState::Dead {
            self.status.apply(effect);
        }
    }

    fn is_alive(&self) -> bool {
        self.fsm.state != AIState::Dead
    }

    fn faction(&self) -> Faction {
        self.faction
    }
}
