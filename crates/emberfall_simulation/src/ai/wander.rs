//! Wander bounds: horizontal strip a calm mob patrols.

use rand::Rng;

/// Minimum distance between the mob and a freshly picked wander target (px).
pub const MIN_WANDER_DISTANCE: f32 = 50.0;
/// Random picks before falling back to a bound edge.
pub const WANDER_PICK_ATTEMPTS: usize = 10;
/// Fallback target sits this far inside the farther edge (px).
pub const WANDER_EDGE_INSET: f32 = 20.0;
/// Drift beyond the bounds tolerated before the target is nudged back (px).
pub const DRIFT_TOLERANCE: f32 = 50.0;
/// Wander target counts as reached within this radius (px).
pub const WANDER_ARRIVAL_RADIUS: f32 = 10.0;

/// Инвариант: min_x ≤ max_x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderBounds {
    pub min_x: f32,
    pub max_x: f32,
}

impl WanderBounds {
    /// Bounds `[center - half_range, center + half_range]`.
    pub fn around(center_x: f32, half_range: f32) -> Self {
        let half_range = half_range.max(0.0);
        Self {
            min_x: center_x - half_range,
            max_x: center_x + half_range,
        }
    }

    pub fn new(min_x: f32, max_x: f32) -> Self {
        Self {
            min_x: min_x.min(max_x),
            max_x: max_x.max(min_x),
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Moves the bounds to be centered on `center_x`, keeping the width.
    pub fn recentre(&mut self, center_x: f32) {
        *self = Self::around(center_x, self.width() * 0.5);
    }

    /// Picks a wander target for a mob at `x`.
    ///
    /// Up to 10 uniform picks at least 50 px away; then the farther edge inset
    /// by 20 px. A zero-width (or unbounded) range steps 50 px in the facing
    /// direction.
    pub fn pick_target(&self, x: f32, facing_right: bool, rng: &mut impl Rng) -> f32 {
        let width = self.width();
        if width <= f32::EPSILON || !width.is_finite() {
            let direction = if facing_right { 1.0 } else { -1.0 };
            return x + MIN_WANDER_DISTANCE * direction;
        }

        for _ in 0..WANDER_PICK_ATTEMPTS {
            let candidate = rng.gen_range(self.min_x..=self.max_x);
            if (candidate - x).abs() >= MIN_WANDER_DISTANCE {
                return candidate;
            }
        }

        self.farther_edge(x)
    }

    fn farther_edge(&self, x: f32) -> f32 {
        let inset = WANDER_EDGE_INSET.min(self.width() * 0.5);
        if x - self.min_x >= self.max_x - x {
            self.min_x + inset
        } else {
            self.max_x - inset
        }
    }

    /// Replacement wander target when `x` drifted more than 50 px outside.
    ///
    /// Only the target moves; the mob walks back on its own.
    pub fn drift_correction(&self, x: f32) -> Option<f32> {
        let inset = WANDER_EDGE_INSET.min(self.width() * 0.5);
        if x < self.min_x - DRIFT_TOLERANCE {
            Some(self.min_x + inset)
        } else if x > self.max_x + DRIFT_TOLERANCE {
            Some(self.max_x - inset)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_fallback_picks_farther_edge() {
        // All-ones RNG always lands on max_x = 300, 10px away
        let bounds = WanderBounds::new(100.0, 300.0);
        let mut rng = StepRng::new(u64::MAX, 0);

        let target = bounds.pick_target(290.0, true, &mut rng);

        assert_abs_diff_eq!(target, 120.0);
    }

    #[test]
    fn test_fallback_toward_max_when_near_min() {
        // Zero RNG always lands on min_x = 100
        let bounds = WanderBounds::new(100.0, 300.0);
        let mut rng = StepRng::new(0, 0);

        assert_abs_diff_eq!(bounds.pick_target(110.0, false, &mut rng), 280.0);
    }

    #[test]
    fn test_random_pick_is_far_enough() {
        let bounds = WanderBounds::new(0.0, 400.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for i in 0..100 {
            let x = (i * 4) as f32;
            let target = bounds.pick_target(x, true, &mut rng);
            assert!((target - x).abs() >= MIN_WANDER_DISTANCE - 1e-3 || target == bounds.farther_edge(x));
            assert!(target >= bounds.min_x && target <= bounds.max_x);
        }
    }

    #[test]
    fn test_zero_width_steps_in_facing_direction() {
        let bounds = WanderBounds::around(200.0, 0.0);
        let mut rng = StepRng::new(0, 0);

        assert_abs_diff_eq!(bounds.pick_target(200.0, true, &mut rng), 250.0);
        assert_abs_diff_eq!(bounds.pick_target(200.0, false, &mut rng), 150.0);
    }

    #[test]
    fn test_unbounded_width_steps_instead_of_sampling() {
        // max - min overflows to infinity
        let bounds = WanderBounds::new(-3.0e38, 3.0e38);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert!(!bounds.width().is_finite());
        assert_abs_diff_eq!(bounds.pick_target(0.0, true, &mut rng), 50.0);
        assert_abs_diff_eq!(bounds.pick_target(0.0, false, &mut rng), -50.0);
    }

    #[test]
    fn test_recentre_keeps_width() {
        let mut bounds = WanderBounds::new(100.0, 300.0);
        bounds.recentre(1000.0);

        assert_abs_diff_eq!(bounds.min_x, 900.0);
        assert_abs_diff_eq!(bounds.max_x, 1100.0);
    }

    #[test]
    fn test_drift_correction_only_past_tolerance() {
        let bounds = WanderBounds::new(100.0, 300.0);

        assert_eq!(bounds.drift_correction(340.0), None);
        assert_eq!(bounds.drift_correction(351.0), Some(280.0));
        assert_eq!(bounds.drift_correction(40.0), Some(120.0));
        assert_eq!(bounds.drift_correction(200.0), None);
    }
}
