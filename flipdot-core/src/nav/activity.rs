//! Activities and activity stacks
//!
//! An activity is a full-screen source that can ask to be finished. A stack
//! shows its top activity through a vertical scroller: pushing slides the
//! new activity in, finishing slides the previous one back.
//!
//! Activities never call into their stack. They answer
//! [`InputResponse::Finish`] or [`InputResponse::Launch`] and the stack
//! acts on the message.

use heapless::Vec;

use crate::config::MAX_ACTIVITY_DEPTH;
use crate::error::{Capacity, GraphError};
use crate::graph::{NodeKind, SourceGraph};
use crate::input::{InputEvent, InputResponse};
use crate::scroll::{Axis, Direction, ScrollInstruction};
use crate::source::{Bounds, SourceId};

/// Button that finishes an activity when its content ignores it
pub const BACK_EVENT: InputEvent = InputEvent::Left;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    pub(crate) content: SourceId,
    pub(crate) finishable: bool,
}

#[derive(Debug, Clone)]
pub struct ActivityStack {
    pub(crate) bounds: Bounds,
    pub(crate) switcher: SourceId,
    pub(crate) activities: Vec<SourceId, MAX_ACTIVITY_DEPTH>,
}

impl SourceGraph {
    /// Wrap `content` in an activity
    pub fn add_activity(&mut self, content: SourceId, finishable: bool) -> Result<SourceId, GraphError> {
        self.check(content)?;
        self.insert(NodeKind::Activity(Activity { content, finishable }))
    }

    fn check_activity(&self, id: SourceId) -> Result<(), GraphError> {
        match &self.node(id).ok_or(GraphError::UnknownSource)?.kind {
            NodeKind::Activity(_) => Ok(()),
            _ => Err(GraphError::WrongKind),
        }
    }

    /// Add a stack whose bottom entry is `root`
    pub fn add_activity_stack(&mut self, bounds: Bounds, root: SourceId) -> Result<SourceId, GraphError> {
        self.check_activity(root)?;
        let switcher = self.add_scroller(Axis::Vertical, bounds, root)?;
        let mut activities = Vec::new();
        activities
            .push(root)
            .map_err(|_| GraphError::CapacityExceeded(Capacity::StackDepth))?;
        self.insert(NodeKind::Stack(ActivityStack {
            bounds,
            switcher,
            activities,
        }))
    }

    fn stack(&self, id: SourceId) -> Result<&ActivityStack, GraphError> {
        match &self.node(id).ok_or(GraphError::UnknownSource)?.kind {
            NodeKind::Stack(s) => Ok(s),
            _ => Err(GraphError::WrongKind),
        }
    }

    fn stack_mut(&mut self, id: SourceId) -> Result<&mut ActivityStack, GraphError> {
        match &mut self.node_mut(id).ok_or(GraphError::UnknownSource)?.kind {
            NodeKind::Stack(s) => Ok(s),
            _ => Err(GraphError::WrongKind),
        }
    }

    pub fn stack_depth(&self, stack: SourceId) -> Option<usize> {
        self.stack(stack).ok().map(|s| s.activities.len())
    }

    pub fn stack_top(&self, stack: SourceId) -> Option<SourceId> {
        self.stack(stack).ok()?.activities.last().copied()
    }

    /// Scroller that animates a stack's transitions
    pub fn stack_scroller(&self, stack: SourceId) -> Option<SourceId> {
        self.stack(stack).ok().map(|s| s.switcher)
    }

    /// Push `activity` and slide it in
    pub fn push_activity(&mut self, stack: SourceId, activity: SourceId) -> Result<(), GraphError> {
        self.check_activity(activity)?;
        let s = self.stack(stack)?;
        if s.activities.contains(&activity) {
            return Err(GraphError::AlreadyOnStack);
        }
        if s.activities.is_full() {
            return Err(GraphError::CapacityExceeded(Capacity::StackDepth));
        }
        let (switcher, page, old_top) = (s.switcher, s.bounds.height, s.activities.last().copied());

        self.transition(switcher, ScrollInstruction::new(activity, page, Direction::Forward))?;
        if let Some(old_top) = old_top {
            self.set_focused(old_top, false);
        }
        self.stack_mut(stack)?
            .activities
            .push(activity)
            .map_err(|_| GraphError::CapacityExceeded(Capacity::StackDepth))
    }

    /// Remove the top activity and slide back to the one below
    ///
    /// The root entry is never removed. Returns the finished activity.
    pub fn finish_activity(&mut self, stack: SourceId) -> Result<SourceId, GraphError> {
        let s = self.stack(stack)?;
        let [.., below, top] = s.activities.as_slice() else {
            return Err(GraphError::Empty);
        };
        let (switcher, page, below, top) = (s.switcher, s.bounds.height, *below, *top);

        self.transition(switcher, ScrollInstruction::new(below, page, Direction::Backward))?;
        self.set_focused(top, false);
        self.stack_mut(stack)?.activities.pop();
        Ok(top)
    }

    pub(crate) fn activity_input(&mut self, id: SourceId, event: InputEvent, depth: u8) -> InputResponse {
        let Some(NodeKind::Activity(activity)) = self.node(id).map(|n| &n.kind) else {
            return InputResponse::Ignored;
        };
        let activity = *activity;
        match self.handle_input_at(activity.content, event, depth) {
            InputResponse::Ignored if event == BACK_EVENT && activity.finishable => {
                InputResponse::Finish
            }
            response => response,
        }
    }

    pub(crate) fn stack_input(&mut self, id: SourceId, event: InputEvent, depth: u8) -> InputResponse {
        let Some(top) = self.stack_top(id) else {
            return InputResponse::Ignored;
        };
        match self.handle_input_at(top, event, depth) {
            InputResponse::Finish => match self.finish_activity(id) {
                Ok(_) => InputResponse::Handled,
                Err(_) => InputResponse::Ignored,
            },
            InputResponse::Launch(activity) => match self.push_activity(id, activity) {
                Ok(()) => InputResponse::Handled,
                Err(_) => InputResponse::Ignored,
            },
            response => response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::ScrollStep;
    use crate::source::{LeafKind, Lifecycle};

    const PAGE: Bounds = Bounds::new(40, 7);

    fn settle(graph: &mut SourceGraph, scroller: SourceId) {
        while !matches!(
            graph.advance_scroller(scroller),
            ScrollStep::Idle | ScrollStep::Settled
        ) {}
    }

    fn probe_activity(graph: &mut SourceGraph, finishable: bool) -> (SourceId, SourceId) {
        let probe = graph.add_leaf(LeafKind::probe(), 40, 7).unwrap();
        (probe, graph.add_activity(probe, finishable).unwrap())
    }

    #[test]
    fn test_finishable_activity() {
        let mut graph = SourceGraph::new();
        let (_, finishable) = probe_activity(&mut graph, true);
        let (_, fixed) = probe_activity(&mut graph, false);

        assert_eq!(graph.handle_input(finishable, BACK_EVENT), InputResponse::Finish);
        assert_eq!(graph.handle_input(finishable, InputEvent::Right), InputResponse::Ignored);
        assert_eq!(graph.handle_input(fixed, BACK_EVENT), InputResponse::Ignored);
    }

    #[test]
    fn test_content_consumes_back() {
        let mut graph = SourceGraph::new();
        let label = graph.add_leaf(LeafKind::label("x"), 40, 7).unwrap();
        let counter = graph.add_leaf(LeafKind::Counter(0), 40, 7).unwrap();
        let item = crate::nav::NavigationNode::new(label, Some(counter));
        let menu = graph.add_menu(Axis::Vertical, PAGE, &[item], false).unwrap();
        let activity = graph.add_activity(menu, true).unwrap();

        graph.handle_input(activity, InputEvent::Center);
        // The menu drills out instead of the activity finishing
        assert_eq!(graph.handle_input(activity, BACK_EVENT), InputResponse::Handled);
        assert_eq!(graph.handle_input(activity, BACK_EVENT), InputResponse::Finish);
    }

    #[test]
    fn test_push_and_finish() {
        let mut graph = SourceGraph::new();
        let (root_probe, root) = probe_activity(&mut graph, false);
        let (top_probe, top) = probe_activity(&mut graph, true);
        let stack = graph.add_activity_stack(PAGE, root).unwrap();
        let scroller = graph.stack_scroller(stack).unwrap();
        graph.set_focused(stack, true);
        assert_eq!(graph.lifecycle(root_probe), Lifecycle::Focused);

        graph.push_activity(stack, top).unwrap();
        assert_eq!(graph.stack_depth(stack), Some(2));
        assert_eq!(graph.stack_top(stack), Some(top));
        assert_eq!(graph.lifecycle(root_probe), Lifecycle::Visible);
        settle(&mut graph, scroller);
        assert_eq!(graph.lifecycle(root_probe), Lifecycle::Invisible);
        assert_eq!(graph.lifecycle(top_probe), Lifecycle::Focused);

        assert_eq!(graph.finish_activity(stack), Ok(top));
        assert_eq!(graph.stack_depth(stack), Some(1));
        settle(&mut graph, scroller);
        assert_eq!(graph.lifecycle(top_probe), Lifecycle::Invisible);
        assert_eq!(graph.lifecycle(root_probe), Lifecycle::Focused);
    }

    #[test]
    fn test_root_is_never_finished() {
        let mut graph = SourceGraph::new();
        let (_, root) = probe_activity(&mut graph, true);
        let stack = graph.add_activity_stack(PAGE, root).unwrap();

        assert_eq!(graph.finish_activity(stack), Err(GraphError::Empty));
        assert_eq!(graph.handle_input(stack, BACK_EVENT), InputResponse::Ignored);
        assert_eq!(graph.stack_depth(stack), Some(1));
    }

    #[test]
    fn test_stack_interprets_messages() {
        let mut graph = SourceGraph::new();
        let timer = graph.add_leaf(LeafKind::countdown(0), 40, 7).unwrap();
        let timer_activity = graph.add_activity(timer, true).unwrap();
        let shortcut = graph
            .add_leaf(LeafKind::shortcut("Timer", timer_activity), 40, 7)
            .unwrap();
        let root = graph.add_activity(shortcut, false).unwrap();
        let stack = graph.add_activity_stack(PAGE, root).unwrap();

        assert_eq!(graph.handle_input(stack, InputEvent::Center), InputResponse::Handled);
        assert_eq!(graph.stack_top(stack), Some(timer_activity));

        // Only the top activity sees input now
        assert_eq!(graph.handle_input(stack, InputEvent::Up), InputResponse::Handled);
        assert_eq!(
            graph.leaf(timer).unwrap().kind(),
            &LeafKind::Countdown {
                remaining_s: 60,
                running: false
            }
        );

        assert_eq!(graph.handle_input(stack, BACK_EVENT), InputResponse::Handled);
        assert_eq!(graph.stack_top(stack), Some(root));
    }

    #[test]
    fn test_push_rejects_duplicates_and_overflow() {
        let mut graph = SourceGraph::new();
        let (_, root) = probe_activity(&mut graph, false);
        let stack = graph.add_activity_stack(PAGE, root).unwrap();
        assert_eq!(graph.push_activity(stack, root), Err(GraphError::AlreadyOnStack));

        for _ in 1..MAX_ACTIVITY_DEPTH {
            let (_, a) = probe_activity(&mut graph, true);
            graph.push_activity(stack, a).unwrap();
        }
        let (_, extra) = probe_activity(&mut graph, true);
        assert_eq!(
            graph.push_activity(stack, extra),
            Err(GraphError::CapacityExceeded(Capacity::StackDepth))
        );
    }

    #[test]
    fn test_wrong_kinds() {
        let mut graph = SourceGraph::new();
        let leaf = graph.add_leaf(LeafKind::label("x"), 40, 7).unwrap();
        assert_eq!(graph.add_activity_stack(PAGE, leaf), Err(GraphError::WrongKind));
        let (_, root) = probe_activity(&mut graph, false);
        let stack = graph.add_activity_stack(PAGE, root).unwrap();
        assert_eq!(graph.push_activity(stack, leaf), Err(GraphError::WrongKind));
        assert_eq!(graph.finish_activity(leaf), Err(GraphError::WrongKind));
    }
}
