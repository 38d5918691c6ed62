//! Animated scrolling between sources
//!
//! A scroller holds a FIFO of [`ScrollInstruction`]s and moves its offset
//! one pixel per tick towards the head instruction's target. Step timing
//! follows an inverse-distance curve, see [`easing`].

pub mod easing;
pub mod instruction;
pub mod scroller;

pub use easing::{remaining_distance, step_delay};
pub use instruction::{Axis, Direction, Enqueued, ScrollInstruction, ScrollStep};
pub use scroller::{Scroller, ScrollerState};
