//! Entity base contract shared by every layer above geometry.
//!
//! The core never holds references into the live entity list. Each tick the
//! ECS layer flattens everything a mob may look at into a `WorldSnapshot`
//! (identity, kind, bounds, facing, aliveness); mobs read it, and anything
//! they want to do to other entities comes back out as data.

use bevy::prelude::*;

use crate::combat::{DamageOutcome, StatusEffect};
use crate::geometry::Bounds;

/// What an entry of the entity list is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Mob,
    Block,
    Projectile,
}

/// Side of a fight. Hostile attacks only land on `Player`-faction combatants
/// and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum Faction {
    Player,
    #[default]
    Hostile,
}

impl Faction {
    pub fn is_enemy_of(&self, other: Faction) -> bool {
        *self != other
    }
}

/// Read-only view of one entity for the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityView {
    pub entity: Entity,
    pub kind: EntityKind,
    pub faction: Option<Faction>,
    pub bounds: Bounds,
    pub facing_right: bool,
    pub alive: bool,
}

impl EntityView {
    /// Can be targeted by mob AI (alive player).
    pub fn is_player_capable(&self) -> bool {
        self.kind == EntityKind::Player && self.alive
    }

    /// Can receive hits from `attacker` faction.
    pub fn is_hittable_by(&self, attacker: Faction) -> bool {
        self.alive
            && matches!(self.kind, EntityKind::Player | EntityKind::Mob)
            && self.faction.is_some_and(|faction| attacker.is_enemy_of(faction))
    }
}

/// Per-tick snapshot of the entity list.
///
/// Rebuilt between ticks, read by every mob and projectile within a tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct WorldSnapshot {
    entities: Vec<EntityView>,
}

impl WorldSnapshot {
    pub fn new(entities: Vec<EntityView>) -> Self {
        Self { entities }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityView> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Looks up an entity; `None` when it despawned since the handle was taken.
    pub fn get(&self, entity: Entity) -> Option<&EntityView> {
        self.entities.iter().find(|view| view.entity == entity)
    }

    /// First alive player-capable entity in list order.
    pub fn first_player(&self) -> Option<&EntityView> {
        self.entities.iter().find(|view| view.is_player_capable())
    }

    pub fn solid_blocks(&self) -> impl Iterator<Item = Bounds> + '_ {
        self.entities
            .iter()
            .filter(|view| view.kind == EntityKind::Block)
            .map(|view| view.bounds)
    }

    /// Everything `attacker` may hit, excluding `exclude` (usually the attacker itself).
    pub fn hittable_by(
        &self,
        attacker: Faction,
        exclude: Option<Entity>,
    ) -> impl Iterator<Item = &EntityView> + '_ {
        self.entities
            .iter()
            .filter(move |view| Some(view.entity) != exclude && view.is_hittable_by(attacker))
    }
}

/// Static solid block (level geometry).
#[derive(Component, Debug, Clone, Copy)]
pub struct SolidBlock {
    pub bounds: Bounds,
}

impl SolidBlock {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            bounds: Bounds::new(x, y, width, height),
        }
    }
}

/// Capability contract of anything that can be targeted and hit.
///
/// Implemented by `Mob` and `PlayerBody`; the core never depends on a
/// concrete player type.
pub trait Combatant {
    fn bounds(&self) -> Bounds;

    fn position(&self) -> Vec2;

    fn is_facing_right(&self) -> bool;

    /// Discrete hit. Ignored while invincible or dead.
    fn take_damage(&mut self, amount: f32, knockback: Vec2) -> DamageOutcome;

    /// Attaches (or refreshes) a damage-over-time effect.
    fn apply_status(&mut self, effect: StatusEffect);

    fn is_alive(&self) -> bool;

    fn faction(&self) -> Faction;
}
