//! Display tree, scroll scheduler and navigation for the flip-dot wall
//!
//! This crate holds everything that does not touch hardware:
//!
//! - Pixel sources and the arena that owns them ([`graph`], [`source`])
//! - Scroll instructions, easing and the per-scroller scheduler ([`scroll`])
//! - Menus, activities and stacks built from scrollers ([`nav`])
//! - Frame composition and diffing into driver commands ([`render`])
//! - Configuration type definitions ([`config`])
//!
//! The firmware shares one [`SourceGraph`](graph::SourceGraph) between its
//! tasks through [`SharedGraph`](shared::SharedGraph).

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod graph;
pub mod input;
pub mod nav;
pub mod render;
pub mod scroll;
pub mod shared;
pub mod source;

pub use error::{Capacity, GraphError};
pub use graph::SourceGraph;
pub use input::{InputEvent, InputResponse};
pub use shared::SharedGraph;
pub use source::SourceId;
