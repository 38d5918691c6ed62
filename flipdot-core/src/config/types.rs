//! Configuration type definitions
//!
//! These types describe the physical wall, the render cadence and the
//! scroll animation tuning. The firmware fills them from its embedded TOML
//! file and validates them once at start-up.

use flipdot_protocol::{Orientation, DATA_MASK, FRAME_REGISTER_COUNT, MAX_MODULE_ADDRESS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of nodes in one source graph
pub const MAX_SOURCES: usize = 64;

/// Maximum children of a composite
pub const MAX_CHILDREN: usize = 8;

/// Maximum navigation nodes per menu
pub const MAX_MENU_ITEMS: usize = 7;

/// Maximum queued scroll instructions per scroller
pub const MAX_QUEUED_INSTRUCTIONS: usize = 16;

/// Maximum activities on one stack
pub const MAX_ACTIVITY_DEPTH: usize = 8;

/// Maximum stacks behind a stack switcher
pub const MAX_STACKS: usize = 4;

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum depth of nested source references
pub const MAX_NESTING: u8 = 16;

/// Maximum driver modules on one line (3-bit address)
pub const MAX_MODULES: u8 = MAX_MODULE_ADDRESS + 1;

/// Maximum columns per module (one frame register each)
pub const MAX_MODULE_COLUMNS: u8 = FRAME_REGISTER_COUNT;

/// Maximum rows per module (7-bit data bytes)
pub const MAX_ROWS: u8 = 7;

/// Widest possible wall in columns
pub const MAX_COLUMNS: usize = MAX_MODULES as usize * MAX_MODULE_COLUMNS as usize;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A dimension is zero
    ZeroDimension,
    /// More modules than the protocol can address
    TooManyModules,
    /// More columns per module than frame registers
    TooManyColumns,
    /// More rows than fit in a data byte
    TooManyRows,
    /// Minimum step delay above maximum, or zero
    InvalidStepRange,
    /// Render interval of zero
    ZeroFrameInterval,
    /// Framerate does not fit in a data byte
    InvalidFramerate,
    /// Orientation uses bits outside the register
    InvalidOrientation,
    /// Clock start time out of range
    InvalidClock,
}

/// Physical layout of the wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayGeometry {
    /// Number of driver modules, addressed 0.. from the left
    pub modules: u8,
    /// Columns per module
    pub module_columns: u8,
    /// Rows per module
    pub rows: u8,
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self {
            modules: 8,
            module_columns: 5,
            rows: 7,
        }
    }
}

impl DisplayGeometry {
    /// Total width in columns
    pub fn width(&self) -> u8 {
        self.modules.saturating_mul(self.module_columns)
    }

    pub fn height(&self) -> u8 {
        self.rows
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.modules == 0 || self.module_columns == 0 || self.rows == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if self.modules > MAX_MODULES {
            return Err(ConfigError::TooManyModules);
        }
        if self.module_columns > MAX_MODULE_COLUMNS {
            return Err(ConfigError::TooManyColumns);
        }
        if self.rows > MAX_ROWS {
            return Err(ConfigError::TooManyRows);
        }
        Ok(())
    }
}

/// Scroll animation tuning
///
/// Step delay follows `clamp(k_ms / remaining, min_step_ms, max_step_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnimationConfig {
    /// Easing constant
    pub k_ms: u32,
    /// Fastest step
    pub min_step_ms: u32,
    /// Slowest step
    pub max_step_ms: u32,
    /// Poll interval while a scroller is idle
    pub idle_poll_ms: u32,
    /// Longest time one instruction may animate before it is forced to complete
    pub watchdog_ms: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            k_ms: 100,
            min_step_ms: 10,
            max_step_ms: 200,
            idle_poll_ms: 10,
            watchdog_ms: 5000,
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_step_ms == 0 || self.min_step_ms > self.max_step_ms {
            return Err(ConfigError::InvalidStepRange);
        }
        if self.idle_poll_ms == 0 {
            return Err(ConfigError::InvalidStepRange);
        }
        Ok(())
    }
}

/// Render cadence and module start-up settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderConfig {
    /// Time between render passes
    pub frame_interval_ms: u32,
    /// Orientation register value sent to every module
    pub orientation_bits: u8,
    /// Framerate register value sent to every module
    pub framerate: u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            orientation_bits: Orientation::columns_top_down().to_bits(),
            framerate: 30,
        }
    }
}

impl RenderConfig {
    pub fn orientation(&self) -> Orientation {
        Orientation::from_bits(self.orientation_bits)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::ZeroFrameInterval);
        }
        if self.framerate > DATA_MASK {
            return Err(ConfigError::InvalidFramerate);
        }
        if self.orientation_bits > 0x0F {
            return Err(ConfigError::InvalidOrientation);
        }
        Ok(())
    }
}

/// Wall clock start-up setting
///
/// The controller has no RTC; the clock face counts from this time and shows
/// an unknown time when `known` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockConfig {
    pub known: bool,
    pub hour: u8,
    pub minute: u8,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            known: false,
            hour: 0,
            minute: 0,
        }
    }
}

impl ClockConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hour > 23 || self.minute > 59 {
            return Err(ConfigError::InvalidClock);
        }
        Ok(())
    }

    /// Seconds since midnight at start-up, if the time is known
    pub fn start_seconds(&self) -> Option<u32> {
        self.known
            .then(|| self.hour as u32 * 3600 + self.minute as u32 * 60)
    }
}

/// Complete controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    pub geometry: DisplayGeometry,
    pub render: RenderConfig,
    pub animation: AnimationConfig,
    pub clock: ClockConfig,
}

impl DisplayConfig {
    /// Check every section, reporting the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geometry.validate()?;
        self.render.validate()?;
        self.animation.validate()?;
        self.clock.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DisplayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.geometry.width(), 40);
        assert_eq!(config.geometry.height(), 7);
        assert_eq!(config.render.orientation_bits, 0b1001);
    }

    #[test]
    fn test_geometry_limits() {
        let mut geometry = DisplayGeometry::default();
        geometry.modules = 9;
        assert_eq!(geometry.validate(), Err(ConfigError::TooManyModules));

        let mut geometry = DisplayGeometry::default();
        geometry.module_columns = 8;
        assert_eq!(geometry.validate(), Err(ConfigError::TooManyColumns));

        let mut geometry = DisplayGeometry::default();
        geometry.rows = 0;
        assert_eq!(geometry.validate(), Err(ConfigError::ZeroDimension));
    }

    #[test]
    fn test_animation_step_range() {
        let mut animation = AnimationConfig::default();
        animation.min_step_ms = 300;
        assert_eq!(animation.validate(), Err(ConfigError::InvalidStepRange));
    }

    #[test]
    fn test_render_limits() {
        let mut render = RenderConfig::default();
        render.framerate = 128;
        assert_eq!(render.validate(), Err(ConfigError::InvalidFramerate));

        let mut render = RenderConfig::default();
        render.frame_interval_ms = 0;
        assert_eq!(render.validate(), Err(ConfigError::ZeroFrameInterval));
    }

    #[test]
    fn test_clock_start_seconds() {
        let clock = ClockConfig {
            known: true,
            hour: 4,
            minute: 20,
        };
        assert_eq!(clock.start_seconds(), Some(4 * 3600 + 20 * 60));
        assert_eq!(ClockConfig::default().start_seconds(), None);

        let bad = ClockConfig {
            known: true,
            hour: 24,
            minute: 0,
        };
        assert_eq!(bad.validate(), Err(ConfigError::InvalidClock));
    }
}
