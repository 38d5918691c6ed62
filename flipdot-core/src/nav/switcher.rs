//! Switching between activity stacks
//!
//! The switcher lays its stacks side by side on a horizontal scroller. Input
//! goes to the current stack; left and right presses that the stack leaves
//! alone move to the neighbouring stack.

use heapless::Vec;

use crate::config::MAX_STACKS;
use crate::error::{Capacity, GraphError};
use crate::graph::{NodeKind, SourceGraph};
use crate::input::{InputEvent, InputResponse};
use crate::scroll::{Axis, Direction, ScrollInstruction};
use crate::source::{Bounds, SourceId};

#[derive(Debug, Clone)]
pub struct StackSwitcher {
    pub(crate) bounds: Bounds,
    pub(crate) switcher: SourceId,
    pub(crate) stacks: Vec<SourceId, MAX_STACKS>,
    pub(crate) current: usize,
}

impl SourceGraph {
    /// Add a switcher showing the first of `stacks`
    pub fn add_stack_switcher(
        &mut self,
        bounds: Bounds,
        stacks: &[SourceId],
    ) -> Result<SourceId, GraphError> {
        let first = *stacks.first().ok_or(GraphError::Empty)?;
        for &stack in stacks {
            match &self.node(stack).ok_or(GraphError::UnknownSource)?.kind {
                NodeKind::Stack(_) => {}
                _ => return Err(GraphError::WrongKind),
            }
        }
        let stacks =
            Vec::from_slice(stacks).map_err(|_| GraphError::CapacityExceeded(Capacity::Stacks))?;
        let switcher = self.add_scroller(Axis::Horizontal, bounds, first)?;
        self.insert(NodeKind::Switcher(StackSwitcher {
            bounds,
            switcher,
            stacks,
            current: 0,
        }))
    }

    fn stack_switcher(&self, id: SourceId) -> Result<&StackSwitcher, GraphError> {
        match &self.node(id).ok_or(GraphError::UnknownSource)?.kind {
            NodeKind::Switcher(s) => Ok(s),
            _ => Err(GraphError::WrongKind),
        }
    }

    /// Index of the stack receiving input
    pub fn current_stack(&self, id: SourceId) -> Option<usize> {
        self.stack_switcher(id).ok().map(|s| s.current)
    }

    /// Slide to stack `index`
    pub fn focus_stack(&mut self, id: SourceId, index: usize) -> Result<(), GraphError> {
        let s = self.stack_switcher(id)?;
        let target = *s.stacks.get(index).ok_or(GraphError::OutOfRange)?;
        let (scroller, page, current) = (s.switcher, s.bounds.width, s.current);
        if index == current {
            return Ok(());
        }
        let direction = if index > current {
            Direction::Forward
        } else {
            Direction::Backward
        };
        self.transition(scroller, ScrollInstruction::new(target, page, direction))?;
        if let NodeKind::Switcher(s) = &mut self.node_mut(id).ok_or(GraphError::UnknownSource)?.kind {
            s.current = index;
        }
        Ok(())
    }

    pub(crate) fn switcher_input(&mut self, id: SourceId, event: InputEvent, depth: u8) -> InputResponse {
        let Ok(s) = self.stack_switcher(id) else {
            return InputResponse::Ignored;
        };
        let (current, count) = (s.current, s.stacks.len());
        let Some(&stack) = s.stacks.get(current) else {
            return InputResponse::Ignored;
        };

        let response = self.handle_input_at(stack, event, depth);
        if !response.is_ignored() {
            return response;
        }
        let neighbour = match event {
            InputEvent::Right if current + 1 < count => current + 1,
            InputEvent::Left if current > 0 => current - 1,
            _ => return InputResponse::Ignored,
        };
        match self.focus_stack(id, neighbour) {
            Ok(()) => InputResponse::Handled,
            Err(_) => InputResponse::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::ScrollStep;
    use crate::source::{LeafKind, Lifecycle};

    const PAGE: Bounds = Bounds::new(40, 7);

    fn probe_stack(graph: &mut SourceGraph) -> (SourceId, SourceId) {
        let probe = graph.add_leaf(LeafKind::probe(), 40, 7).unwrap();
        let activity = graph.add_activity(probe, false).unwrap();
        (probe, graph.add_activity_stack(PAGE, activity).unwrap())
    }

    fn scroller(graph: &SourceGraph, id: SourceId) -> SourceId {
        match &graph.node(id).unwrap().kind {
            NodeKind::Switcher(s) => s.switcher,
            _ => unreachable!(),
        }
    }

    fn settle(graph: &mut SourceGraph, scroller: SourceId) {
        while !matches!(
            graph.advance_scroller(scroller),
            ScrollStep::Idle | ScrollStep::Settled
        ) {}
    }

    #[test]
    fn test_construction_errors() {
        let mut graph = SourceGraph::new();
        assert_eq!(graph.add_stack_switcher(PAGE, &[]), Err(GraphError::Empty));
        let leaf = graph.add_leaf(LeafKind::label("x"), 40, 7).unwrap();
        assert_eq!(graph.add_stack_switcher(PAGE, &[leaf]), Err(GraphError::WrongKind));

        let (_, stack) = probe_stack(&mut graph);
        assert_eq!(
            graph.add_stack_switcher(PAGE, &[stack; MAX_STACKS + 1]),
            Err(GraphError::CapacityExceeded(Capacity::Stacks))
        );
    }

    #[test]
    fn test_focus_stack_direction() {
        let mut graph = SourceGraph::new();
        let (first_probe, first) = probe_stack(&mut graph);
        let (second_probe, second) = probe_stack(&mut graph);
        let switcher = graph.add_stack_switcher(PAGE, &[first, second]).unwrap();
        let s = scroller(&graph, switcher);
        graph.set_focused(switcher, true);
        assert_eq!(graph.lifecycle(first_probe), Lifecycle::Focused);

        graph.focus_stack(switcher, 1).unwrap();
        graph.advance_scroller(s);
        assert_eq!(graph.scroller_state(s).unwrap().offset, 1);
        settle(&mut graph, s);
        assert_eq!(graph.current_stack(switcher), Some(1));
        assert_eq!(graph.lifecycle(first_probe), Lifecycle::Invisible);
        assert_eq!(graph.lifecycle(second_probe), Lifecycle::Focused);

        graph.focus_stack(switcher, 0).unwrap();
        graph.advance_scroller(s);
        assert_eq!(graph.scroller_state(s).unwrap().offset, -1);

        assert_eq!(graph.focus_stack(switcher, 4), Err(GraphError::OutOfRange));
    }

    #[test]
    fn test_ignored_sideways_input_switches() {
        let mut graph = SourceGraph::new();
        let (_, first) = probe_stack(&mut graph);
        let (_, second) = probe_stack(&mut graph);
        let switcher = graph.add_stack_switcher(PAGE, &[first, second]).unwrap();

        assert_eq!(graph.handle_input(switcher, InputEvent::Left), InputResponse::Ignored);
        assert_eq!(graph.handle_input(switcher, InputEvent::Right), InputResponse::Handled);
        assert_eq!(graph.current_stack(switcher), Some(1));
        assert_eq!(graph.handle_input(switcher, InputEvent::Right), InputResponse::Ignored);
        assert_eq!(graph.handle_input(switcher, InputEvent::Up), InputResponse::Ignored);
        assert_eq!(graph.handle_input(switcher, InputEvent::Left), InputResponse::Handled);
        assert_eq!(graph.current_stack(switcher), Some(0));
    }

    #[test]
    fn test_only_current_stack_top_gets_input() {
        let mut graph = SourceGraph::new();
        let hidden = graph.add_leaf(LeafKind::Counter(5), 40, 7).unwrap();
        let hidden_root = graph.add_activity(hidden, false).unwrap();
        let hidden_stack = graph.add_activity_stack(PAGE, hidden_root).unwrap();

        let buried = graph.add_leaf(LeafKind::Counter(6), 40, 7).unwrap();
        let root = graph.add_activity(buried, false).unwrap();
        let top_counter = graph.add_leaf(LeafKind::Counter(7), 40, 7).unwrap();
        let top = graph.add_activity(top_counter, true).unwrap();
        let stack = graph.add_activity_stack(PAGE, root).unwrap();
        graph.push_activity(stack, top).unwrap();

        let switcher = graph.add_stack_switcher(PAGE, &[stack, hidden_stack]).unwrap();
        assert_eq!(graph.handle_input(switcher, InputEvent::Center), InputResponse::Handled);

        assert_eq!(graph.leaf(top_counter).unwrap().kind(), &LeafKind::Counter(0));
        assert_eq!(graph.leaf(buried).unwrap().kind(), &LeafKind::Counter(6));
        assert_eq!(graph.leaf(hidden).unwrap().kind(), &LeafKind::Counter(5));
    }

    #[test]
    fn test_out_of_bounds_query() {
        let mut graph = SourceGraph::new();
        let (_, stack) = probe_stack(&mut graph);
        let switcher = graph.add_stack_switcher(PAGE, &[stack]).unwrap();
        graph.ensure_valid(switcher, false);
        for (x, y) in [(-1, 0), (0, -1), (40, 0), (0, 7)] {
            assert!(!graph.query(switcher, x, y));
            assert!(!graph.query(stack, x, y));
        }
    }
}
