//! Scroll instructions and scheduler step results

use crate::config::AnimationConfig;
use crate::input::InputEvent;
use crate::source::{Bounds, SourceId};

/// Axis a scroller moves along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    pub fn perpendicular(self) -> Axis {
        match self {
            Axis::Vertical => Axis::Horizontal,
            Axis::Horizontal => Axis::Vertical,
        }
    }

    /// Length of one page along this axis
    pub fn length(self, bounds: Bounds) -> u8 {
        match self {
            Axis::Vertical => bounds.height,
            Axis::Horizontal => bounds.width,
        }
    }

    /// Button that moves backwards along this axis
    pub fn previous_event(self) -> InputEvent {
        match self {
            Axis::Vertical => InputEvent::Up,
            Axis::Horizontal => InputEvent::Left,
        }
    }

    /// Button that moves forwards along this axis
    pub fn next_event(self) -> InputEvent {
        match self {
            Axis::Vertical => InputEvent::Down,
            Axis::Horizontal => InputEvent::Right,
        }
    }
}

/// Direction of travel
///
/// Forward increases the offset on both axes: the incoming page enters from
/// the bottom or right edge. Backward enters from the top or left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(self) -> i16 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// One queued transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScrollInstruction {
    /// Source that becomes active when the instruction completes
    pub target: SourceId,
    /// Span in pixels along the scroller's axis
    pub distance: u8,
    pub direction: Direction,
}

impl ScrollInstruction {
    pub const fn new(target: SourceId, distance: u8, direction: Direction) -> Self {
        Self {
            target,
            distance,
            direction,
        }
    }
}

/// Outcome of an enqueue that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Enqueued {
    Queued,
    /// Zero-distance instruction, nothing to animate
    Ignored,
}

/// Result of one scheduler tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollStep {
    /// Nothing queued
    Idle,
    /// Offset moved; wait before the next tick
    Moving { delay_ms: u32 },
    /// Last queued instruction completed
    Settled,
}

impl ScrollStep {
    /// How long the animation task should sleep after this step
    pub fn delay_ms(&self, config: &AnimationConfig) -> u32 {
        match self {
            ScrollStep::Moving { delay_ms } => *delay_ms,
            ScrollStep::Idle | ScrollStep::Settled => config.idle_poll_ms,
        }
    }
}
