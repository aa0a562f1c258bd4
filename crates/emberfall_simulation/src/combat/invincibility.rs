//! Invincibility frames
//!
//! Countdown started on every discrete hit. While it runs, further discrete
//! hits are ignored; status-effect ticks are not affected.

/// Flash period of the blink signal exposed to rendering (seconds).
const FLASH_PERIOD: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Invincibility {
    /// Length of a fresh window (seconds)
    pub duration: f32,
    /// Time left in the current window, never negative
    remaining: f32,
}

impl Default for Invincibility {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Invincibility {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            remaining: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Starts a full window.
    pub fn start(&mut self) {
        self.remaining = self.duration;
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    /// Blink flag: on for the first half of each flash period while active.
    pub fn flash_visible(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        let elapsed = self.duration - self.remaining;
        (elapsed / FLASH_PERIOD) as u32 % 2 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_counts_down_and_clamps() {
        let mut frames = Invincibility::new(0.5);
        assert!(!frames.is_active());

        frames.start();
        assert!(frames.is_active());

        frames.tick(0.3);
        assert!(frames.is_active());

        frames.tick(0.3);
        assert!(!frames.is_active());
        assert_eq!(frames.remaining(), 0.0);
    }

    #[test]
    fn test_flash_alternates() {
        let mut frames = Invincibility::new(1.0);
        frames.start();
        assert!(frames.flash_visible());

        frames.tick(0.15);
        assert!(!frames.flash_visible());

        frames.tick(0.1);
        assert!(frames.flash_visible());
    }
}
