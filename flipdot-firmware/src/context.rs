//! State shared by every task

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use flipdot_core::config::DisplayConfig;
use flipdot_core::SharedGraph;

use crate::tree::Tree;

/// Everything the tasks share, built once in `main`
pub struct AppContext {
    pub graph: SharedGraph<CriticalSectionRawMutex>,
    pub tree: Tree,
    pub config: DisplayConfig,
}
