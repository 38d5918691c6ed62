//! Scroller state and scheduler
//!
//! A scroller shows its active source and animates the boundary between
//! the active and inactive sources while an instruction is in flight. The
//! animation task calls [`SourceGraph::advance_scroller`] once per step and
//! sleeps for the delay it returns.
//!
//! Time spent on an instruction is measured in the step delays handed out,
//! which is exactly how long the task sleeps between steps.

use heapless::Deque;

use super::easing::{remaining_distance, step_delay};
use super::instruction::{Axis, Enqueued, ScrollInstruction, ScrollStep};
use crate::config::MAX_QUEUED_INSTRUCTIONS;
use crate::error::GraphError;
use crate::graph::{NodeKind, SourceGraph};
use crate::source::{Bounds, SourceId};

#[derive(Debug, Clone)]
pub struct Scroller {
    pub(crate) axis: Axis,
    pub(crate) bounds: Bounds,
    pub(crate) active: SourceId,
    pub(crate) inactive: SourceId,
    pub(crate) queue: Deque<ScrollInstruction, MAX_QUEUED_INSTRUCTIONS>,
    pub(crate) offset: i16,
    /// Head instruction has begun
    pub(crate) in_flight: bool,
    pub(crate) elapsed_ms: u32,
}

impl Scroller {
    fn new(axis: Axis, bounds: Bounds, active: SourceId) -> Self {
        Self {
            axis,
            bounds,
            active,
            inactive: SourceId::BLANK,
            queue: Deque::new(),
            offset: 0,
            in_flight: false,
            elapsed_ms: 0,
        }
    }

    /// No instruction running or waiting
    pub(crate) fn is_idle(&self) -> bool {
        !self.in_flight && self.queue.is_empty()
    }

    /// Page length along the scroll axis
    pub fn scroll_length(&self) -> u8 {
        self.axis.length(self.bounds)
    }
}

/// Read-only view of a scroller for callers and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScrollerState {
    pub axis: Axis,
    pub active: SourceId,
    pub inactive: SourceId,
    pub offset: i16,
    pub queued: usize,
    pub in_flight: bool,
    pub scroll_length: u8,
}

/// What the commit step decided, collected before lifecycle calls
struct Commit {
    old_active: SourceId,
    target: SourceId,
    settled: bool,
}

impl SourceGraph {
    /// Add a scroller showing `active`
    pub fn add_scroller(
        &mut self,
        axis: Axis,
        bounds: Bounds,
        active: SourceId,
    ) -> Result<SourceId, GraphError> {
        self.check(active)?;
        self.insert(NodeKind::Scroller(Scroller::new(axis, bounds, active)))
    }

    pub(crate) fn scroller(&self, id: SourceId) -> Result<&Scroller, GraphError> {
        match &self.node(id).ok_or(GraphError::UnknownSource)?.kind {
            NodeKind::Scroller(s) => Ok(s),
            _ => Err(GraphError::WrongKind),
        }
    }

    fn scroller_mut(&mut self, id: SourceId) -> Result<&mut Scroller, GraphError> {
        match &mut self.node_mut(id).ok_or(GraphError::UnknownSource)?.kind {
            NodeKind::Scroller(s) => Ok(s),
            _ => Err(GraphError::WrongKind),
        }
    }

    pub fn scroller_state(&self, id: SourceId) -> Option<ScrollerState> {
        let s = self.scroller(id).ok()?;
        Some(ScrollerState {
            axis: s.axis,
            active: s.active,
            inactive: s.inactive,
            offset: s.offset,
            queued: s.queue.len(),
            in_flight: s.in_flight,
            scroll_length: s.scroll_length(),
        })
    }

    /// Queue a transition
    ///
    /// Zero-distance instructions are dropped. A full queue is an error the
    /// navigation layer absorbs.
    pub fn enqueue(
        &mut self,
        scroller: SourceId,
        instruction: ScrollInstruction,
    ) -> Result<Enqueued, GraphError> {
        self.check(instruction.target)?;
        let s = self.scroller_mut(scroller)?;
        if instruction.distance == 0 {
            return Ok(Enqueued::Ignored);
        }
        s.queue
            .push_back(instruction)
            .map_err(|_| GraphError::QueueFull)?;
        Ok(Enqueued::Queued)
    }

    /// Show `target` immediately, dropping anything queued
    pub fn jump_to(&mut self, scroller: SourceId, target: SourceId) -> Result<(), GraphError> {
        self.check(target)?;
        let state = self.lifecycle(scroller);
        let s = self.scroller_mut(scroller)?;
        let old_active = s.active;
        let old_inactive = s.inactive;
        let was_animating = s.in_flight;

        s.queue.clear();
        s.active = target;
        s.inactive = SourceId::BLANK;
        s.offset = 0;
        s.in_flight = false;
        s.elapsed_ms = 0;

        if was_animating && old_inactive != target {
            self.set_visible(old_inactive, false);
        }
        if old_active != target {
            self.set_visible(old_active, false);
        }
        if state.is_focused() {
            self.set_focused(target, true);
        } else if state.is_visible() {
            self.set_visible(target, true);
        }
        self.invalidate(scroller);
        self.request_full_redraw();
        Ok(())
    }

    /// Queue a transition, jumping when there is nothing to animate
    pub(crate) fn transition(
        &mut self,
        scroller: SourceId,
        instruction: ScrollInstruction,
    ) -> Result<(), GraphError> {
        match self.enqueue(scroller, instruction)? {
            Enqueued::Queued => Ok(()),
            Enqueued::Ignored => self.jump_to(scroller, instruction.target),
        }
    }

    /// Run one scheduler tick
    pub fn advance_scroller(&mut self, id: SourceId) -> ScrollStep {
        let config = *self.animation();
        let state = self.lifecycle(id);
        let Ok(s) = self.scroller_mut(id) else {
            return ScrollStep::Idle;
        };
        let Some(head) = s.queue.front().copied() else {
            return ScrollStep::Idle;
        };

        if !s.in_flight {
            s.in_flight = true;
            s.offset = 0;
            s.elapsed_ms = 0;
            s.inactive = head.target;
            let active = s.active;
            if state.is_visible() {
                self.set_visible(head.target, true);
            }
            self.set_focused(active, false);
        }

        let Ok(s) = self.scroller_mut(id) else {
            return ScrollStep::Idle;
        };
        let done = if s.elapsed_ms >= config.watchdog_ms {
            true
        } else {
            s.offset += head.direction.sign();
            s.offset.unsigned_abs() >= head.distance as u16
        };

        if !done {
            let remaining = remaining_distance(&s.queue, s.offset.unsigned_abs() as u32);
            let delay_ms = step_delay(&config, remaining);
            s.elapsed_ms = s.elapsed_ms.saturating_add(delay_ms);
            self.invalidate(id);
            return ScrollStep::Moving { delay_ms };
        }

        let commit = Commit {
            old_active: s.active,
            target: head.target,
            settled: s.queue.len() <= 1,
        };
        s.active = head.target;
        s.inactive = SourceId::BLANK;
        s.offset = 0;
        s.in_flight = false;
        s.elapsed_ms = 0;
        s.queue.pop_front();
        let next_remaining = remaining_distance(&s.queue, 0);

        if commit.old_active != commit.target {
            self.set_visible(commit.old_active, false);
        }
        self.invalidate(id);

        if commit.settled {
            if state.is_focused() {
                self.set_focused(commit.target, true);
            }
            self.request_full_redraw();
            ScrollStep::Settled
        } else {
            ScrollStep::Moving {
                delay_ms: step_delay(&config, next_remaining),
            }
        }
    }

    pub(crate) fn query_scroller(&self, s: &Scroller, x: i16, y: i16, depth: u8) -> bool {
        if !s.bounds.contains(x, y) {
            return false;
        }
        let next = depth + 1;
        let head = match s.queue.front() {
            Some(head) if s.in_flight => head,
            _ => return self.query_at(s.active, x, y, next),
        };

        let span = head.distance as i16;
        let along = match s.axis {
            Axis::Vertical => y,
            Axis::Horizontal => x,
        };
        // Outside the active span the incoming page repeats every `span`
        // cells, which matters when the distance is shorter than the page
        let c = s.offset + along;
        let (source, c) = if (0..span).contains(&c) {
            (s.active, c)
        } else {
            (s.inactive, c.rem_euclid(span.max(1)))
        };
        match s.axis {
            Axis::Vertical => self.query_at(source, x, c, next),
            Axis::Horizontal => self.query_at(source, c, y, next),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnimationConfig;
    use crate::scroll::Direction;
    use crate::source::{LeafKind, Lifecycle};
    use proptest::prelude::*;

    const PAGE: Bounds = Bounds::new(40, 7);

    fn page(graph: &mut SourceGraph, n: u32) -> SourceId {
        graph.add_leaf(LeafKind::Counter(n), 40, 7).unwrap()
    }

    fn drain(graph: &mut SourceGraph, id: SourceId) -> usize {
        let mut steps = 0;
        loop {
            match graph.advance_scroller(id) {
                ScrollStep::Idle | ScrollStep::Settled => return steps,
                ScrollStep::Moving { .. } => steps += 1,
            }
            assert!(steps < 10_000, "scroller never settled");
        }
    }

    #[test]
    fn test_scroll_length_seven_scenario() {
        let mut graph = SourceGraph::new();
        let a = page(&mut graph, 1);
        let b = page(&mut graph, 2);
        let s = graph.add_scroller(Axis::Vertical, PAGE, a).unwrap();
        assert_eq!(graph.scroller_state(s).unwrap().scroll_length, 7);

        graph
            .enqueue(s, ScrollInstruction::new(b, 7, Direction::Forward))
            .unwrap();
        drain(&mut graph, s);
        graph.ensure_valid(s, false);

        let state = graph.scroller_state(s).unwrap();
        assert_eq!(state.offset, 0);
        assert_eq!(state.active, b);
        assert_eq!(state.inactive, SourceId::BLANK);
        for x in 0..40 {
            for y in 0..7 {
                assert_eq!(graph.query(s, x, y), graph.query(b, x, y));
            }
        }
    }

    #[test]
    fn test_zero_distance_ignored() {
        let mut graph = SourceGraph::new();
        let a = page(&mut graph, 1);
        let s = graph.add_scroller(Axis::Vertical, PAGE, a).unwrap();
        assert_eq!(
            graph.enqueue(s, ScrollInstruction::new(a, 0, Direction::Forward)),
            Ok(Enqueued::Ignored)
        );
        assert_eq!(graph.advance_scroller(s), ScrollStep::Idle);
    }

    #[test]
    fn test_queue_full() {
        let mut graph = SourceGraph::new();
        let a = page(&mut graph, 1);
        let s = graph.add_scroller(Axis::Vertical, PAGE, a).unwrap();
        for _ in 0..MAX_QUEUED_INSTRUCTIONS {
            graph
                .enqueue(s, ScrollInstruction::new(a, 7, Direction::Forward))
                .unwrap();
        }
        assert_eq!(
            graph.enqueue(s, ScrollInstruction::new(a, 7, Direction::Forward)),
            Err(GraphError::QueueFull)
        );
    }

    #[test]
    fn test_enqueue_on_non_scroller() {
        let mut graph = SourceGraph::new();
        let a = page(&mut graph, 1);
        assert_eq!(
            graph.enqueue(a, ScrollInstruction::new(a, 7, Direction::Forward)),
            Err(GraphError::WrongKind)
        );
        assert_eq!(graph.advance_scroller(a), ScrollStep::Idle);
    }

    #[test]
    fn test_midway_composition_vertical() {
        let mut graph = SourceGraph::new();
        let a = page(&mut graph, 1);
        let b = page(&mut graph, 2);
        let s = graph.add_scroller(Axis::Vertical, PAGE, a).unwrap();
        graph
            .enqueue(s, ScrollInstruction::new(b, 7, Direction::Forward))
            .unwrap();
        for _ in 0..3 {
            graph.advance_scroller(s);
        }
        graph.ensure_valid(s, false);
        assert_eq!(graph.scroller_state(s).unwrap().offset, 3);

        for x in 0..40 {
            for y in 0..7 {
                let expected = if y + 3 < 7 {
                    graph.query(a, x, y + 3)
                } else {
                    graph.query(b, x, y + 3 - 7)
                };
                assert_eq!(graph.query(s, x, y), expected);
            }
        }
    }

    #[test]
    fn test_midway_composition_backward_horizontal() {
        let mut graph = SourceGraph::new();
        let a = page(&mut graph, 1);
        let b = page(&mut graph, 2);
        let s = graph.add_scroller(Axis::Horizontal, PAGE, a).unwrap();
        graph
            .enqueue(s, ScrollInstruction::new(b, 40, Direction::Backward))
            .unwrap();
        for _ in 0..10 {
            graph.advance_scroller(s);
        }
        graph.ensure_valid(s, false);
        assert_eq!(graph.scroller_state(s).unwrap().offset, -10);

        for x in 0..40 {
            for y in 0..7 {
                let expected = if x >= 10 {
                    graph.query(a, x - 10, y)
                } else {
                    graph.query(b, x + 30, y)
                };
                assert_eq!(graph.query(s, x, y), expected);
            }
        }
    }

    #[test]
    fn test_short_distance_wraps_incoming_page() {
        let mut graph = SourceGraph::new();
        let a = page(&mut graph, 1);
        let b = page(&mut graph, 2);
        let s = graph.add_scroller(Axis::Horizontal, PAGE, a).unwrap();
        graph
            .enqueue(s, ScrollInstruction::new(b, 5, Direction::Forward))
            .unwrap();
        graph.advance_scroller(s);
        graph.ensure_valid(s, false);
        assert_eq!(graph.scroller_state(s).unwrap().offset, 1);

        for x in 0..40 {
            for y in 0..7 {
                let c = x + 1;
                let expected = if c < 5 {
                    graph.query(a, c, y)
                } else {
                    graph.query(b, c % 5, y)
                };
                assert_eq!(graph.query(s, x, y), expected, "column {}", x);
            }
        }
    }

    #[test]
    fn test_out_of_bounds_while_animating() {
        let mut graph = SourceGraph::new();
        let a = page(&mut graph, 1);
        let b = page(&mut graph, 2);
        let s = graph.add_scroller(Axis::Vertical, PAGE, a).unwrap();
        graph
            .enqueue(s, ScrollInstruction::new(b, 7, Direction::Forward))
            .unwrap();
        graph.advance_scroller(s);
        for (x, y) in [(-1, 0), (0, -1), (40, 0), (0, 7)] {
            assert!(!graph.query(s, x, y));
        }
    }

    #[test]
    fn test_focus_handover() {
        let mut graph = SourceGraph::new();
        let a = graph.add_leaf(LeafKind::probe(), 40, 7).unwrap();
        let b = graph.add_leaf(LeafKind::probe(), 40, 7).unwrap();
        let s = graph.add_scroller(Axis::Vertical, PAGE, a).unwrap();
        graph.set_focused(s, true);
        assert_eq!(graph.lifecycle(a), Lifecycle::Focused);

        graph
            .enqueue(s, ScrollInstruction::new(b, 7, Direction::Forward))
            .unwrap();
        graph.advance_scroller(s);
        // Both transiently visible, neither focused
        assert_eq!(graph.lifecycle(a), Lifecycle::Visible);
        assert_eq!(graph.lifecycle(b), Lifecycle::Visible);

        drain(&mut graph, s);
        assert_eq!(graph.lifecycle(a), Lifecycle::Invisible);
        assert_eq!(graph.lifecycle(b), Lifecycle::Focused);
    }

    #[test]
    fn test_settle_requests_full_redraw() {
        let mut graph = SourceGraph::new();
        let a = page(&mut graph, 1);
        let b = page(&mut graph, 2);
        let s = graph.add_scroller(Axis::Vertical, PAGE, a).unwrap();
        graph.take_full_redraw();
        graph
            .enqueue(s, ScrollInstruction::new(b, 7, Direction::Forward))
            .unwrap();
        graph.advance_scroller(s);
        assert!(!graph.take_full_redraw());
        drain(&mut graph, s);
        assert!(graph.take_full_redraw());
    }

    #[test]
    fn test_watchdog_forces_completion() {
        let animation = AnimationConfig {
            k_ms: 1_000_000,
            max_step_ms: 1000,
            watchdog_ms: 2000,
            ..AnimationConfig::default()
        };
        let mut graph = SourceGraph::with_animation(animation);
        let a = page(&mut graph, 1);
        let b = page(&mut graph, 2);
        let s = graph.add_scroller(Axis::Vertical, PAGE, a).unwrap();
        graph
            .enqueue(s, ScrollInstruction::new(b, 200, Direction::Forward))
            .unwrap();

        assert_eq!(graph.advance_scroller(s), ScrollStep::Moving { delay_ms: 1000 });
        assert_eq!(graph.advance_scroller(s), ScrollStep::Moving { delay_ms: 1000 });
        assert_eq!(graph.advance_scroller(s), ScrollStep::Settled);
        assert_eq!(graph.scroller_state(s).unwrap().active, b);
    }

    #[test]
    fn test_jump_to_clears_queue() {
        let mut graph = SourceGraph::new();
        let a = page(&mut graph, 1);
        let b = page(&mut graph, 2);
        let c = page(&mut graph, 3);
        let s = graph.add_scroller(Axis::Vertical, PAGE, a).unwrap();
        graph.set_visible(s, true);
        graph
            .enqueue(s, ScrollInstruction::new(b, 7, Direction::Forward))
            .unwrap();
        graph.advance_scroller(s);

        graph.jump_to(s, c).unwrap();
        let state = graph.scroller_state(s).unwrap();
        assert_eq!(state.active, c);
        assert_eq!(state.queued, 0);
        assert!(!state.in_flight);
        assert_eq!(graph.lifecycle(a), Lifecycle::Invisible);
        assert_eq!(graph.lifecycle(b), Lifecycle::Invisible);
        assert_eq!(graph.lifecycle(c), Lifecycle::Visible);
        assert_eq!(graph.advance_scroller(s), ScrollStep::Idle);
    }

    #[test]
    fn test_consecutive_instructions_ease_as_one() {
        let mut graph = SourceGraph::new();
        let a = page(&mut graph, 1);
        let b = page(&mut graph, 2);
        let c = page(&mut graph, 3);
        let s = graph.add_scroller(Axis::Vertical, PAGE, a).unwrap();
        graph
            .enqueue(s, ScrollInstruction::new(b, 7, Direction::Forward))
            .unwrap();
        graph
            .enqueue(s, ScrollInstruction::new(c, 7, Direction::Forward))
            .unwrap();

        // 13 pixels left after the first step: 100 / 13
        assert_eq!(graph.advance_scroller(s), ScrollStep::Moving { delay_ms: 10 });
        let mut last = 0;
        loop {
            match graph.advance_scroller(s) {
                ScrollStep::Moving { delay_ms } => {
                    assert!(delay_ms >= last);
                    last = delay_ms;
                }
                ScrollStep::Settled => break,
                ScrollStep::Idle => panic!("went idle before settling"),
            }
        }
        assert_eq!(graph.scroller_state(s).unwrap().active, c);
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![Just(Direction::Forward), Just(Direction::Backward)]
    }

    proptest! {
        #[test]
        fn test_fifo_and_offset_convergence(
            steps in proptest::collection::vec((1u8..=12, direction()), 1..MAX_QUEUED_INSTRUCTIONS)
        ) {
            let mut graph = SourceGraph::new();
            let start = page(&mut graph, 0);
            let s = graph.add_scroller(Axis::Vertical, PAGE, start).unwrap();
            let mut targets = std::vec::Vec::new();
            for (i, (distance, direction)) in steps.iter().enumerate() {
                let target = page(&mut graph, i as u32 + 1);
                targets.push(target);
                graph
                    .enqueue(s, ScrollInstruction::new(target, *distance, *direction))
                    .unwrap();
            }

            let mut completed = std::vec::Vec::new();
            let mut net: i32 = 0;
            let mut current = 0usize;
            let mut last_active = start;
            loop {
                let step = graph.advance_scroller(s);
                let state = graph.scroller_state(s).unwrap();

                if state.in_flight {
                    let (distance, direction) = steps[current];
                    prop_assert!(state.offset.unsigned_abs() <= distance as u16);
                    prop_assert_eq!(state.offset.signum() as i8, direction.sign() as i8);
                    prop_assert_eq!(state.inactive, targets[current]);
                }
                if state.active != last_active {
                    let (distance, direction) = steps[current];
                    net += direction.sign() as i32 * distance as i32;
                    completed.push(state.active);
                    last_active = state.active;
                    current += 1;
                }
                if step == ScrollStep::Settled {
                    break;
                }
                prop_assert!(step != ScrollStep::Idle);
            }

            prop_assert_eq!(completed, targets);
            prop_assert_eq!(graph.scroller_state(s).unwrap().offset, 0);
            let expected: i32 = steps.iter().map(|(d, dir)| dir.sign() as i32 * *d as i32).sum();
            prop_assert_eq!(net, expected);
        }
    }
}
