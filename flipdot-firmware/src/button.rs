//! Button debouncing
//!
//! Buttons are active-low with pull-ups, so a low pin means pressed.

use embassy_time::{Duration, Instant};

/// Contact bounce window
pub const DEBOUNCE_MS: u64 = 50;

/// Debounced edge detection for one button
#[derive(Clone, Copy)]
pub struct ButtonState {
    pressed: bool,
    last_change: Option<Instant>,
}

impl ButtonState {
    pub const fn new() -> Self {
        Self {
            pressed: false,
            last_change: None,
        }
    }

    /// Feed the current pin level; true only on the press edge
    pub fn just_pressed(&mut self, is_low: bool) -> bool {
        if is_low == self.pressed {
            return false;
        }
        if let Some(last) = self.last_change {
            if last.elapsed() < Duration::from_millis(DEBOUNCE_MS) {
                return false;
            }
        }
        self.pressed = is_low;
        self.last_change = Some(Instant::now());
        is_low
    }

    /// How long the button has been held, if it is down
    pub fn held_for(&self) -> Option<Duration> {
        match (self.pressed, self.last_change) {
            (true, Some(since)) => Some(since.elapsed()),
            _ => None,
        }
    }
}

impl Default for ButtonState {
    fn default() -> Self {
        Self::new()
    }
}
