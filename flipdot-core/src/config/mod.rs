//! Configuration types
//!
//! Board-agnostic configuration structures shared by the core and firmware.

pub mod types;

pub use types::*;
