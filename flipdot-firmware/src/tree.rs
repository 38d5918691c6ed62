//! The source tree shown on the wall
//!
//! ```text
//! switcher
//! ├── main stack
//! │   └── launcher activity
//! │       └── launcher menu (horizontal)
//! │           ├── clock face
//! │           ├── "Counter"  -> counter
//! │           ├── "Test"     -> test menu (vertical): probe, "Focus" -> probe
//! │           ├── "Settings" -> settings menu (vertical): "About" -> version
//! │           └── "Timer"    launches the countdown activity
//! └── clock stack
//!     └── clock activity
//!         └── view of the clock face
//! ```

use flipdot_core::config::DisplayGeometry;
use flipdot_core::nav::NavigationNode;
use flipdot_core::scroll::Axis;
use flipdot_core::source::{Bounds, LeafKind};
use flipdot_core::{GraphError, SourceGraph, SourceId};

/// Countdown preset when the timer is first opened
const TIMER_PRESET_S: u32 = 5 * 60;

/// Handles the leaf tasks and the render task need
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tree {
    pub root: SourceId,
    pub clock: SourceId,
    pub counter: SourceId,
    pub countdown: SourceId,
}

/// Build the tree into `graph` and give the root focus
pub fn build(graph: &mut SourceGraph, geometry: &DisplayGeometry) -> Result<Tree, GraphError> {
    let (width, height) = (geometry.width(), geometry.height());
    let page = Bounds::new(width, height);
    let label =
        |graph: &mut SourceGraph, text: &str| graph.add_leaf(LeafKind::label(text), width, height);

    let clock = graph.add_leaf(LeafKind::Clock(None), width, height)?;
    let counter = graph.add_leaf(LeafKind::Counter(0), width, height)?;
    let counter_cover = label(graph, "Counter")?;

    let probe = graph.add_leaf(LeafKind::probe(), width, height)?;
    let focus_probe = graph.add_leaf(LeafKind::probe(), width, height)?;
    let focus_cover = label(graph, "Focus")?;
    let test_menu = graph.add_menu(
        Axis::Vertical,
        page,
        &[
            NavigationNode::cover_only(probe),
            NavigationNode::new(focus_cover, Some(focus_probe)),
        ],
        false,
    )?;
    let test_cover = label(graph, "Test")?;

    let about_cover = label(graph, "About")?;
    let about = label(graph, env!("CARGO_PKG_VERSION"))?;
    let settings_menu = graph.add_menu(
        Axis::Vertical,
        page,
        &[NavigationNode::new(about_cover, Some(about))],
        false,
    )?;
    let settings_cover = label(graph, "Settings")?;

    let countdown = graph.add_leaf(LeafKind::countdown(TIMER_PRESET_S), width, height)?;
    let countdown_activity = graph.add_activity(countdown, true)?;
    let timer = graph.add_leaf(LeafKind::shortcut("Timer", countdown_activity), width, height)?;

    let launcher = graph.add_menu(
        Axis::Horizontal,
        page,
        &[
            NavigationNode::cover_only(clock),
            NavigationNode::new(counter_cover, Some(counter)),
            NavigationNode::new(test_cover, Some(test_menu)),
            NavigationNode::new(settings_cover, Some(settings_menu)),
            NavigationNode::cover_only(timer),
        ],
        true,
    )?;
    let launcher_activity = graph.add_activity(launcher, false)?;
    let main_stack = graph.add_activity_stack(page, launcher_activity)?;

    let clock_view = graph.add_consumer(Some(clock))?;
    let clock_activity = graph.add_activity(clock_view, false)?;
    let clock_stack = graph.add_activity_stack(page, clock_activity)?;

    let root = graph.add_stack_switcher(page, &[main_stack, clock_stack])?;
    graph.set_focused(root, true);
    graph.request_full_redraw();

    Ok(Tree {
        root,
        clock,
        counter,
        countdown,
    })
}
