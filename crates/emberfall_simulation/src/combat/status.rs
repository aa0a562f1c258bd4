//! Damage-over-time status effects (burning / frozen / poisoned).
//!
//! Status damage is not a discrete hit: it ticks straight into health and
//! ignores invincibility frames. Re-applying a kind that is already active
//! resets its remaining duration instead of stacking a second instance.

use bevy::prelude::*;

/// Status effect kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum StatusEffectKind {
    Burning,
    Frozen,
    Poisoned,
}

impl StatusEffectKind {
    /// Default duration (seconds).
    pub fn default_duration(&self) -> f32 {
        match self {
            StatusEffectKind::Burning => 3.0,
            StatusEffectKind::Frozen => 4.0,
            StatusEffectKind::Poisoned => 5.0,
        }
    }

    pub fn default_damage_per_tick(&self) -> f32 {
        match self {
            StatusEffectKind::Burning => 5.0,
            StatusEffectKind::Frozen => 3.0,
            StatusEffectKind::Poisoned => 2.0,
        }
    }

    /// Seconds between damage ticks.
    pub fn tick_interval(&self) -> f32 {
        match self {
            StatusEffectKind::Burning => 0.5,
            StatusEffectKind::Frozen => 1.0,
            StatusEffectKind::Poisoned => 1.0,
        }
    }

    /// Movement speed multiplier while active.
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            StatusEffectKind::Frozen => 0.5,
            StatusEffectKind::Burning | StatusEffectKind::Poisoned => 1.0,
        }
    }

    /// RGBA tint for the rendering collaborator.
    pub fn tint(&self) -> [f32; 4] {
        match self {
            StatusEffectKind::Burning => [1.0, 0.45, 0.2, 1.0],
            StatusEffectKind::Frozen => [0.55, 0.8, 1.0, 1.0],
            StatusEffectKind::Poisoned => [0.5, 1.0, 0.4, 1.0],
        }
    }
}

/// One active (or about to be applied) status effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    /// Seconds left
    pub remaining: f32,
    pub damage_per_tick: f32,
    /// Time accumulated toward the next damage tick
    pub tick_accumulator: f32,
    /// Scales the damage of the hit that delivers this effect
    pub impact_multiplier: f32,
}

impl StatusEffect {
    /// Effect with the kind's default duration and damage.
    pub fn new(kind: StatusEffectKind) -> Self {
        Self {
            kind,
            remaining: kind.default_duration(),
            damage_per_tick: kind.default_damage_per_tick(),
            tick_accumulator: 0.0,
            impact_multiplier: 1.0,
        }
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.remaining = duration.max(0.0);
        self
    }

    pub fn with_damage_per_tick(mut self, damage: f32) -> Self {
        self.damage_per_tick = damage.max(0.0);
        self
    }

    pub fn with_impact_multiplier(mut self, multiplier: f32) -> Self {
        self.impact_multiplier = multiplier.max(0.0);
        self
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn tint(&self) -> [f32; 4] {
        self.kind.tint()
    }

    /// Advances by `dt`, returns damage dealt during this step.
    ///
    /// Only time inside the remaining duration counts toward ticks, so an
    /// effect never deals a tick after it ran out.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let active = dt.min(self.remaining).max(0.0);
        self.remaining = (self.remaining - dt).max(0.0);
        self.tick_accumulator += active;

        let interval = self.kind.tick_interval();
        let mut damage = 0.0;
        while self.tick_accumulator + 1e-4 >= interval {
            self.tick_accumulator -= interval;
            damage += self.damage_per_tick;
        }
        damage
    }
}

/// Active effects on one combatant, at most one per kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusEffects {
    active: Vec<StatusEffect>,
}

impl StatusEffects {
    /// Adds `effect`, or refreshes the duration (and damage) of the same kind.
    pub fn apply(&mut self, effect: StatusEffect) {
        if let Some(existing) = self.active.iter_mut().find(|e| e.kind == effect.kind) {
            existing.remaining = effect.remaining;
            existing.damage_per_tick = effect.damage_per_tick;
        } else {
            self.active.push(effect);
        }
    }

    /// Ticks every effect, drops expired ones, returns total damage.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let damage = self.active.iter_mut().map(|effect| effect.tick(dt)).sum();
        self.active.retain(|effect| !effect.is_expired());
        damage
    }

    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.active.iter().any(|effect| effect.kind == kind)
    }

    pub fn get(&self, kind: StatusEffectKind) -> Option<&StatusEffect> {
        self.active.iter().find(|effect| effect.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.active.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Product of all active speed multipliers.
    pub fn speed_multiplier(&self) -> f32 {
        self.active
            .iter()
            .map(|effect| effect.kind.speed_multiplier())
            .product()
    }

    /// Tint of the most recently applied effect.
    pub fn tint(&self) -> Option<[f32; 4]> {
        self.active.last().map(StatusEffect::tint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_burning_totals() {
        let mut burning = StatusEffect::new(StatusEffectKind::Burning);
        let mut total = 0.0;

        // 3s at 60Hz + a little extra past expiry
        for _ in 0..240 {
            total += burning.tick(1.0 / 60.0);
        }

        // 3.0s / 0.5s = 6 ticks × 5 dmg
        assert_abs_diff_eq!(total, 30.0);
        assert!(burning.is_expired());
    }

    #[test]
    fn test_poison_ticks_once_per_second() {
        let mut poison = StatusEffect::new(StatusEffectKind::Poisoned);

        assert_eq!(poison.tick(0.5), 0.0);
        assert_eq!(poison.tick(0.5), 2.0);
        assert_eq!(poison.tick(0.99), 0.0);
    }

    #[test]
    fn test_reapply_refreshes_instead_of_stacking() {
        let mut effects = StatusEffects::default();
        effects.apply(StatusEffect::new(StatusEffectKind::Poisoned));
        effects.tick(4.0);

        let remaining = effects.get(StatusEffectKind::Poisoned).map(|e| e.remaining);
        assert_abs_diff_eq!(remaining.unwrap_or_default(), 1.0);

        effects.apply(StatusEffect::new(StatusEffectKind::Poisoned));

        assert_eq!(effects.iter().count(), 1);
        let remaining = effects.get(StatusEffectKind::Poisoned).map(|e| e.remaining);
        assert_abs_diff_eq!(remaining.unwrap_or_default(), 5.0);
    }

    #[test]
    fn test_frozen_slows_movement() {
        let mut effects = StatusEffects::default();
        assert_eq!(effects.speed_multiplier(), 1.0);

        effects.apply(StatusEffect::new(StatusEffectKind::Frozen));
        effects.apply(StatusEffect::new(StatusEffectKind::Burning));

        assert_abs_diff_eq!(effects.speed_multiplier(), 0.5);
        assert_eq!(effects.tint(), Some(StatusEffectKind::Burning.tint()));
    }

    #[test]
    fn test_expired_effects_are_removed() {
        let mut effects = StatusEffects::default();
        effects.apply(StatusEffect::new(StatusEffectKind::Frozen).with_duration(1.0));

        let damage = effects.tick(1.5);

        assert_abs_diff_eq!(damage, 3.0);
        assert!(effects.is_empty());
    }
}
