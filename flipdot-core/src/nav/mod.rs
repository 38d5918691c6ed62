//! Navigation built on scrollers
//!
//! Menus, activities and stacks are wrappers around one scroller each. They
//! turn button presses into scroll instructions and interpret the
//! [`InputResponse`](crate::input::InputResponse) messages their children
//! return.

pub mod activity;
pub mod menu;
pub mod switcher;

pub use activity::{Activity, ActivityStack};
pub use menu::{MenuState, SubMenu};
pub use switcher::StackSwitcher;

use crate::source::SourceId;

/// A menu entry: what is shown while selecting, and what drilling in opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavigationNode {
    pub cover: SourceId,
    pub content: Option<SourceId>,
}

impl NavigationNode {
    pub const fn new(cover: SourceId, content: Option<SourceId>) -> Self {
        Self { cover, content }
    }

    /// Entry with nothing to drill into
    pub const fn cover_only(cover: SourceId) -> Self {
        Self {
            cover,
            content: None,
        }
    }
}
