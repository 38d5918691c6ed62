//! Render loop core
//!
//! A render pass samples the root source into a [`Frame`], compares it with
//! the last frame sent and encodes the difference as driver commands. The
//! wall is split into modules from left to right; module `n` answers to
//! address `n` and holds one frame register per column.
//!
//! Only the contiguous run of changed columns inside each module is
//! written. A full redraw writes every column and then commits, which makes
//! the module re-energize every pixel. The first pass is always full.

pub mod frame;

pub use frame::{compose, Composed, Frame};

use flipdot_protocol::{CommandBuffer, ModuleAddress, Orientation, ProtocolError};

use crate::config::{DisplayGeometry, RenderConfig};
use crate::graph::SourceGraph;
use crate::source::SourceId;

/// What one pass put on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PassStats {
    pub full_redraw: bool,
    pub modules_written: u8,
    pub columns_written: u8,
    pub bytes: usize,
}

/// Diffs frames against what the modules already show
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    geometry: DisplayGeometry,
    orientation: Orientation,
    framerate: u8,
    last_sent: Frame,
    /// `last_sent` matches the modules
    primed: bool,
}

impl FrameRenderer {
    pub fn new(geometry: DisplayGeometry, render: &RenderConfig) -> Self {
        Self {
            geometry,
            orientation: render.orientation(),
            framerate: render.framerate,
            last_sent: Frame::new(geometry.width()),
            primed: false,
        }
    }

    pub fn geometry(&self) -> &DisplayGeometry {
        &self.geometry
    }

    /// Last frame the modules were sent
    pub fn last_sent(&self) -> &Frame {
        &self.last_sent
    }

    /// Start-up settings for every module: orientation then framerate
    pub fn configure_modules<const N: usize>(
        &self,
        out: &mut CommandBuffer<N>,
    ) -> Result<(), ProtocolError> {
        for module in 0..self.geometry.modules {
            let address = ModuleAddress::try_from(module)?;
            out.configure(address, self.orientation)?;
            out.set_framerate(address, self.framerate)?;
        }
        Ok(())
    }

    /// Compose and encode one pass
    pub fn render<const N: usize>(
        &mut self,
        graph: &mut SourceGraph,
        root: SourceId,
        out: &mut CommandBuffer<N>,
    ) -> Result<PassStats, ProtocolError> {
        let composed = compose(graph, root, &self.geometry);
        self.encode(&composed.frame, composed.full_redraw, out)
    }

    /// Encode the difference between `frame` and the last frame sent
    ///
    /// On error the renderer forgets what the modules show, so the next
    /// pass is a full redraw.
    pub fn encode<const N: usize>(
        &mut self,
        frame: &Frame,
        full_redraw: bool,
        out: &mut CommandBuffer<N>,
    ) -> Result<PassStats, ProtocolError> {
        let full_redraw = full_redraw || !self.primed;
        let start = out.len();
        let mut stats = PassStats {
            full_redraw,
            ..PassStats::default()
        };

        let result = self.encode_modules(frame, full_redraw, out, &mut stats);
        match result {
            Ok(()) => {
                self.last_sent = *frame;
                self.primed = true;
                stats.bytes = out.len() - start;
                Ok(stats)
            }
            Err(e) => {
                self.primed = false;
                Err(e)
            }
        }
    }

    fn encode_modules<const N: usize>(
        &self,
        frame: &Frame,
        full_redraw: bool,
        out: &mut CommandBuffer<N>,
        stats: &mut PassStats,
    ) -> Result<(), ProtocolError> {
        let width = self.geometry.module_columns as usize;
        for module in 0..self.geometry.modules {
            let address = ModuleAddress::try_from(module)?;
            let first = module as usize * width;
            let new = frame.columns().get(first..first + width).unwrap_or(&[]);
            let old = self.last_sent.columns().get(first..first + width).unwrap_or(&[]);

            let run = if full_redraw {
                (!new.is_empty()).then(|| (0, new.len()))
            } else {
                changed_run(old, new)
            };
            let Some((start, end)) = run else {
                continue;
            };

            out.write_frame(address, start as u8, &new[start..end])?;
            if full_redraw {
                out.commit(address)?;
            }
            stats.modules_written += 1;
            stats.columns_written += (end - start) as u8;
        }
        Ok(())
    }

    /// Turn every dot off with a full redraw
    pub fn blank<const N: usize>(
        &mut self,
        out: &mut CommandBuffer<N>,
    ) -> Result<PassStats, ProtocolError> {
        let frame = Frame::new(self.geometry.width());
        self.encode(&frame, true, out)
    }
}

/// Half-open range covering every differing column
fn changed_run(old: &[u8], new: &[u8]) -> Option<(usize, usize)> {
    let differs = |i: &usize| old.get(*i) != new.get(*i);
    let start = (0..new.len()).find(differs)?;
    let end = (0..new.len()).rev().find(differs)? + 1;
    Some((start, end))
}
