//! Column frames sampled from the source graph

use crate::config::{DisplayGeometry, MAX_COLUMNS, MAX_ROWS};
use crate::graph::SourceGraph;
use crate::source::SourceId;

/// One picture of the whole wall, one byte per column
///
/// Bit `y` of a column is row `y` counted from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    columns: [u8; MAX_COLUMNS],
    width: u8,
}

impl Frame {
    /// All-off frame `width` columns wide
    pub fn new(width: u8) -> Self {
        Self {
            columns: [0; MAX_COLUMNS],
            width: width.min(MAX_COLUMNS as u8),
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn columns(&self) -> &[u8] {
        &self.columns[..self.width as usize]
    }

    pub fn column(&self, x: u8) -> u8 {
        self.columns().get(x as usize).copied().unwrap_or(0)
    }

    pub fn set_column(&mut self, x: u8, value: u8) {
        if x < self.width {
            self.columns[x as usize] = value;
        }
    }

    pub fn pixel(&self, x: u8, y: u8) -> bool {
        y < 8 && self.column(x) & (1 << y) != 0
    }
}

/// Frame plus whether it must be sent in full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Composed {
    pub frame: Frame,
    pub full_redraw: bool,
}

/// Sample `root` into a frame
///
/// The full redraw request is consumed before sampling, so a request made
/// while this frame is being transmitted applies to the next one.
pub fn compose(graph: &mut SourceGraph, root: SourceId, geometry: &DisplayGeometry) -> Composed {
    let full_redraw = graph.take_full_redraw();
    graph.ensure_valid(root, false);

    let mut frame = Frame::new(geometry.width());
    for x in 0..frame.width() {
        let mut column = 0u8;
        for y in 0..geometry.rows.min(MAX_ROWS) {
            if graph.query(root, x as i16, y as i16) {
                column |= 1 << y;
            }
        }
        frame.set_column(x, column);
    }
    Composed { frame, full_redraw }
}
