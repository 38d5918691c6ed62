//! Pixel sources
//!
//! Every node of the display tree is a pixel source: it answers pixel
//! queries, caches its pixels until invalidated, and tracks whether it is
//! on screen and whether it owns input focus. Nodes live in the
//! [`SourceGraph`](crate::graph::SourceGraph) arena and refer to each other
//! by [`SourceId`].

pub mod bitmap;
pub mod composite;
pub mod consumer;
pub mod leaf;

pub use bitmap::{Bitmap, MAX_BITMAP_HEIGHT};
pub use composite::{Composite, Placement};
pub use consumer::Consumer;
pub use leaf::{ClockTime, Leaf, LeafKind, ProbeCounts, ProbeHook, ProbeState};

/// Handle to a node in a source graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SourceId(u8);

impl SourceId {
    /// The shared blank placeholder (always slot 0)
    pub const BLANK: SourceId = SourceId(0);

    pub(crate) const fn from_index(index: usize) -> Self {
        SourceId(index as u8)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Lifecycle state of a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lifecycle {
    #[default]
    Invisible,
    Visible,
    /// Visible and receiving input
    Focused,
}

impl Lifecycle {
    pub fn is_visible(self) -> bool {
        self != Lifecycle::Invisible
    }

    pub fn is_focused(self) -> bool {
        self == Lifecycle::Focused
    }
}

/// Declared size of a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bounds {
    pub width: u8,
    pub height: u8,
}

impl Bounds {
    pub const fn new(width: u8, height: u8) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, x: i16, y: i16) -> bool {
        x >= 0 && y >= 0 && x < self.width as i16 && y < self.height as i16
    }
}
