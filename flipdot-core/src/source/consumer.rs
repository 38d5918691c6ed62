//! Consumer sources
//!
//! A consumer is a non-owning reference to another source. Every call is
//! forwarded to the referent; an unbound consumer renders off and ignores
//! input. Binding and releasing never affect whether the referent exists.

use super::SourceId;
use crate::error::GraphError;
use crate::graph::{NodeKind, SourceGraph};
use crate::source::Lifecycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Consumer {
    pub(crate) target: Option<SourceId>,
}

impl SourceGraph {
    /// Add a consumer, optionally bound to `target`
    pub fn add_consumer(&mut self, target: Option<SourceId>) -> Result<SourceId, GraphError> {
        if let Some(target) = target {
            self.check(target)?;
        }
        self.insert(NodeKind::Consumer(Consumer { target }))
    }

    pub fn consumer_target(&self, consumer: SourceId) -> Option<SourceId> {
        match &self.node(consumer)?.kind {
            NodeKind::Consumer(c) => c.target,
            _ => None,
        }
    }

    fn swap_target(
        &mut self,
        consumer: SourceId,
        target: Option<SourceId>,
    ) -> Result<Option<SourceId>, GraphError> {
        let node = self.node_mut(consumer).ok_or(GraphError::UnknownSource)?;
        let NodeKind::Consumer(c) = &mut node.kind else {
            return Err(GraphError::WrongKind);
        };
        let previous = core::mem::replace(&mut c.target, target);
        node.valid = false;
        Ok(previous)
    }

    /// Point the consumer at a new referent
    ///
    /// A visible consumer hides its previous referent and hands its own
    /// lifecycle state to the new one.
    pub fn bind(&mut self, consumer: SourceId, target: SourceId) -> Result<(), GraphError> {
        self.check(target)?;
        let previous = self.swap_target(consumer, Some(target))?;
        let state = self.lifecycle(consumer);

        if let Some(previous) = previous.filter(|p| *p != target) {
            if state.is_visible() {
                self.set_visible(previous, false);
            }
        }
        match state {
            Lifecycle::Focused => self.set_focused(target, true),
            Lifecycle::Visible => self.set_visible(target, true),
            Lifecycle::Invisible => {}
        }
        Ok(())
    }

    /// Drop the reference; the consumer renders off afterwards
    pub fn release(&mut self, consumer: SourceId) -> Result<(), GraphError> {
        let previous = self.swap_target(consumer, None)?;
        if let Some(previous) = previous {
            if self.lifecycle(consumer).is_visible() {
                self.set_visible(previous, false);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, InputResponse};
    use crate::source::{Bounds, LeafKind};

    #[test]
    fn test_unbound_renders_off() {
        let mut graph = SourceGraph::new();
        let consumer = graph.add_consumer(None).unwrap();
        assert!(!graph.ensure_valid(consumer, false));
        assert!(!graph.query(consumer, 0, 0));
        assert!(!graph.is_valid(consumer));
        assert_eq!(graph.bounds(consumer), Bounds::default());
        assert_eq!(
            graph.handle_input(consumer, InputEvent::Center),
            InputResponse::Ignored
        );
    }

    #[test]
    fn test_forwards_to_target() {
        let mut graph = SourceGraph::new();
        let counter = graph.add_leaf(LeafKind::Counter(3), 40, 7).unwrap();
        let consumer = graph.add_consumer(Some(counter)).unwrap();

        assert!(graph.ensure_valid(consumer, false));
        assert_eq!(graph.bounds(consumer), Bounds::new(40, 7));
        for x in 0..5 {
            for y in 0..7 {
                assert_eq!(graph.query(consumer, x, y), graph.query(counter, x, y));
            }
        }
        assert!(!graph.query(consumer, 40, 0));

        assert_eq!(
            graph.handle_input(consumer, InputEvent::Center),
            InputResponse::Handled
        );
        assert_eq!(graph.leaf(counter).unwrap().kind(), &LeafKind::Counter(0));
    }

    #[test]
    fn test_rebind_moves_lifecycle() {
        let mut graph = SourceGraph::new();
        let a = graph.add_leaf(LeafKind::probe(), 40, 7).unwrap();
        let b = graph.add_leaf(LeafKind::probe(), 40, 7).unwrap();
        let consumer = graph.add_consumer(Some(a)).unwrap();

        graph.set_focused(consumer, true);
        assert_eq!(graph.lifecycle(a), Lifecycle::Focused);

        graph.bind(consumer, b).unwrap();
        assert_eq!(graph.lifecycle(a), Lifecycle::Invisible);
        assert_eq!(graph.lifecycle(b), Lifecycle::Focused);
        assert_eq!(graph.consumer_target(consumer), Some(b));
    }

    #[test]
    fn test_release_keeps_referent() {
        let mut graph = SourceGraph::new();
        let a = graph.add_leaf(LeafKind::Counter(1), 40, 7).unwrap();
        let consumer = graph.add_consumer(Some(a)).unwrap();
        graph.set_visible(consumer, true);

        graph.release(consumer).unwrap();
        assert_eq!(graph.consumer_target(consumer), None);
        assert_eq!(graph.lifecycle(a), Lifecycle::Invisible);
        assert!(!graph.query(consumer, 0, 0));

        // Referent is untouched and still usable
        assert!(graph.ensure_valid(a, false));
        assert!(graph.leaf(a).is_some());
    }

    #[test]
    fn test_bind_wrong_kind() {
        let mut graph = SourceGraph::new();
        let a = graph.add_leaf(LeafKind::Counter(1), 40, 7).unwrap();
        assert_eq!(graph.bind(a, a), Err(GraphError::WrongKind));
        assert_eq!(
            graph.add_consumer(Some(SourceId::from_index(63))),
            Err(GraphError::UnknownSource)
        );
    }
}
