//! Source graph shared between tasks
//!
//! Every task touches the graph through one blocking mutex. Each access is
//! a short synchronous closure: a scheduler step, an enqueue, a leaf update
//! or a whole render composition. Nothing awaits while holding the lock, so
//! a render pass never observes a half-applied step.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::graph::SourceGraph;

pub struct SharedGraph<M: RawMutex> {
    inner: Mutex<M, RefCell<SourceGraph>>,
}

impl<M: RawMutex> SharedGraph<M> {
    pub const fn new(graph: SourceGraph) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(graph)),
        }
    }

    /// Run `f` with exclusive access to the graph
    ///
    /// Must not be called re-entrantly from inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&mut SourceGraph) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}
