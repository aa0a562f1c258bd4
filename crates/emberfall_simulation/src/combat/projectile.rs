//! Projectile simulation
//!
//! Архитектура:
//! - Projectile владеет только собой: update() двигает его и возвращает
//!   PendingHit'ы, которые применяются позже (Resolve set)
//! - Lifetime считается в кадрах (fixed ticks), не в секундах
//! - Piercing: сколько ДОПОЛНИТЕЛЬНЫХ целей пробивает; hit memory не дает
//!   ударить одну цель дважды
//! - Explosive kinds (BOMB / POTION / FIREBALL) взрываются при любом impact
//!   и по истечении lifetime

use bevy::prelude::*;

use crate::combat::{PendingHit, StatusEffect, StatusEffectKind};
use crate::entity::{Faction, WorldSnapshot};
use crate::geometry::Bounds;

/// Fraction of horizontal knockback applied upward on a direct hit.
const DIRECT_HIT_LIFT: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ProjectileKind {
    Arrow,
    Bolt,
    MagicBolt,
    Fireball,
    Iceball,
    ThrowingKnife,
    ThrowingAxe,
    Rock,
    Potion,
    Bomb,
    Fish,
}

/// Per-kind defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    /// px/s
    pub speed: f32,
    /// px/s², None = straight line
    pub gravity: Option<f32>,
    pub damage: f32,
    pub knockback: f32,
    pub lifetime_frames: u32,
    pub piercing: u32,
    pub explosion_radius: Option<f32>,
    pub status: Option<StatusEffect>,
    pub size: Vec2,
}

impl ProjectileKind {
    pub const ALL: [ProjectileKind; 11] = [
        ProjectileKind::Arrow,
        ProjectileKind::Bolt,
        ProjectileKind::MagicBolt,
        ProjectileKind::Fireball,
        ProjectileKind::Iceball,
        ProjectileKind::ThrowingKnife,
        ProjectileKind::ThrowingAxe,
        ProjectileKind::Rock,
        ProjectileKind::Potion,
        ProjectileKind::Bomb,
        ProjectileKind::Fish,
    ];

    pub fn spec(&self) -> ProjectileSpec {
        let base = ProjectileSpec {
            speed: 500.0,
            gravity: None,
            damage: 8.0,
            knockback: 100.0,
            lifetime_frames: 180,
            piercing: 0,
            explosion_radius: None,
            status: None,
            size: Vec2::new(12.0, 12.0),
        };

        match self {
            ProjectileKind::Arrow => ProjectileSpec {
                speed: 600.0,
                gravity: Some(200.0),
                damage: 8.0,
                knockback: 120.0,
                size: Vec2::new(16.0, 4.0),
                ..base
            },
            ProjectileKind::Bolt => ProjectileSpec {
                speed: 800.0,
                damage: 12.0,
                knockback: 160.0,
                lifetime_frames: 150,
                piercing: 1,
                size: Vec2::new(14.0, 4.0),
                ..base
            },
            ProjectileKind::MagicBolt => ProjectileSpec {
                speed: 500.0,
                damage: 10.0,
                knockback: 80.0,
                lifetime_frames: 120,
                size: Vec2::new(10.0, 10.0),
                ..base
            },
            ProjectileKind::Fireball => ProjectileSpec {
                speed: 400.0,
                damage: 14.0,
                knockback: 150.0,
                lifetime_frames: 150,
                explosion_radius: Some(48.0),
                status: Some(StatusEffect::new(StatusEffectKind::Burning)),
                size: Vec2::new(16.0, 16.0),
                ..base
            },
            ProjectileKind::Iceball => ProjectileSpec {
                speed: 420.0,
                damage: 10.0,
                knockback: 60.0,
                lifetime_frames: 150,
                status: Some(StatusEffect::new(StatusEffectKind::Frozen)),
                size: Vec2::new(14.0, 14.0),
                ..base
            },
            ProjectileKind::ThrowingKnife => ProjectileSpec {
                speed: 650.0,
                gravity: Some(250.0),
                damage: 7.0,
                knockback: 60.0,
                lifetime_frames: 120,
                size: Vec2::new(12.0, 4.0),
                ..base
            },
            ProjectileKind::ThrowingAxe => ProjectileSpec {
                speed: 500.0,
                gravity: Some(600.0),
                damage: 14.0,
                knockback: 200.0,
                lifetime_frames: 150,
                piercing: 1,
                size: Vec2::new(14.0, 14.0),
                ..base
            },
            ProjectileKind::Rock => ProjectileSpec {
                speed: 450.0,
                gravity: Some(900.0),
                damage: 6.0,
                knockback: 140.0,
                ..base
            },
            ProjectileKind::Potion => ProjectileSpec {
                speed: 380.0,
                gravity: Some(900.0),
                damage: 4.0,
                knockback: 40.0,
                explosion_radius: Some(64.0),
                status: Some(StatusEffect::new(StatusEffectKind::Poisoned)),
                size: Vec2::new(10.0, 12.0),
                ..base
            },
            ProjectileKind::Bomb => ProjectileSpec {
                speed: 350.0,
                gravity: Some(900.0),
                damage: 30.0,
                knockback: 300.0,
                lifetime_frames: 240,
                explosion_radius: Some(96.0),
                size: Vec2::new(14.0, 14.0),
                ..base
            },
            ProjectileKind::Fish => ProjectileSpec {
                speed: 420.0,
                gravity: Some(700.0),
                damage: 2.0,
                knockback: 30.0,
                size: Vec2::new(16.0, 8.0),
                ..base
            },
        }
    }

    pub fn is_explosive(&self) -> bool {
        self.spec().explosion_radius.is_some()
    }
}

/// Live projectile.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Projectile {
    pub kind: ProjectileKind,
    /// Center
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity: Option<f32>,
    pub damage: f32,
    pub knockback: f32,
    pub lifetime_frames: u32,
    pub piercing: u32,
    pub explosion_radius: Option<f32>,
    pub status: Option<StatusEffect>,
    pub size: Vec2,
    pub faction: Faction,
    pub owner: Option<Entity>,
    hit_entities: Vec<Entity>,
    consumed: bool,
}

/// Output of one projectile tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectileStep {
    pub hits: Vec<PendingHit>,
    /// Consumed by an impact or out of lifetime; owner should despawn it
    pub expired: bool,
    /// Center of the explosion, if it went off this tick
    pub exploded_at: Option<Vec2>,
}

impl Projectile {
    /// Projectile of `kind` launched from `origin` along `direction`.
    pub fn launch(
        kind: ProjectileKind,
        origin: Vec2,
        direction: Vec2,
        faction: Faction,
        owner: Option<Entity>,
    ) -> Self {
        let spec = kind.spec();
        let direction = direction.try_normalize().unwrap_or(Vec2::X);
        Self {
            kind,
            position: origin,
            velocity: direction * spec.speed,
            gravity: spec.gravity,
            damage: spec.damage,
            knockback: spec.knockback,
            lifetime_frames: spec.lifetime_frames,
            piercing: spec.piercing,
            explosion_radius: spec.explosion_radius,
            status: spec.status,
            size: spec.size,
            faction,
            owner,
            hit_entities: Vec::new(),
            consumed: false,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_center(self.position, self.size.x, self.size.y)
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Entities already struck by this projectile.
    pub fn hit_entities(&self) -> &[Entity] {
        &self.hit_entities
    }

    /// Advances one frame against the snapshot.
    pub fn update(&mut self, dt: f32, snapshot: &WorldSnapshot) -> ProjectileStep {
        let mut step = ProjectileStep::default();
        if self.consumed {
            step.expired = true;
            return step;
        }

        if let Some(gravity) = self.gravity {
            self.velocity.y += gravity * dt;
        }
        self.position += self.velocity * dt;
        let bounds = self.bounds();

        if snapshot.solid_blocks().any(|block| block.intersects(&bounds)) {
            self.impact(snapshot, &mut step);
            return step;
        }

        let struck: Vec<_> = snapshot
            .hittable_by(self.faction, self.owner)
            .filter(|view| view.bounds.intersects(&bounds))
            .filter(|view| !self.hit_entities.contains(&view.entity))
            .map(|view| view.entity)
            .collect();

        for target in struck {
            if self.explosion_radius.is_some() {
                self.impact(snapshot, &mut step);
                return step;
            }

            step.hits.push(self.direct_hit(target));
            self.hit_entities.push(target);

            if self.piercing == 0 {
                self.consumed = true;
                step.expired = true;
                return step;
            }
            self.piercing -= 1;
        }

        self.lifetime_frames = self.lifetime_frames.saturating_sub(1);
        if self.lifetime_frames == 0 {
            if self.explosion_radius.is_some() {
                self.impact(snapshot, &mut step);
            } else {
                self.consumed = true;
                step.expired = true;
            }
        }

        step
    }

    fn direct_hit(&self, target: Entity) -> PendingHit {
        let direction = if self.velocity.x < 0.0 { -1.0 } else { 1.0 };
        let knockback = Vec2::new(
            self.knockback * direction,
            -self.knockback * DIRECT_HIT_LIFT,
        );
        PendingHit::new(self.owner, target, self.damage, knockback).with_status(self.status)
    }

    /// Consumes the projectile; explosive kinds hit everything in radius.
    fn impact(&mut self, snapshot: &WorldSnapshot, step: &mut ProjectileStep) {
        self.consumed = true;
        step.expired = true;

        let Some(radius) = self.explosion_radius else {
            return;
        };
        let center = self.position;
        step.exploded_at = Some(center);

        for view in snapshot.hittable_by(self.faction, self.owner) {
            if self.hit_entities.contains(&view.entity) {
                continue;
            }
            if view.bounds.distance_to_point(center) > radius {
                continue;
            }
            let push = (view.bounds.center() - center)
                .try_normalize()
                .unwrap_or(Vec2::NEG_Y);
            step.hits.push(
                PendingHit::new(self.owner, view.entity, self.damage, push * self.knockback)
                    .with_status(self.status),
            );
            self.hit_entities.push(view.entity);
        }
    }
}
