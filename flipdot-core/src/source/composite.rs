//! Composite sources
//!
//! A composite lays children out on a fixed grid. Children listed later are
//! painted over earlier ones wherever their areas overlap.

use heapless::Vec;

use super::{Bounds, SourceId};
use crate::config::MAX_CHILDREN;
use crate::error::{Capacity, GraphError};
use crate::graph::{NodeKind, SourceGraph};

/// A child and where its top-left corner sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Placement {
    pub source: SourceId,
    pub x: i16,
    pub y: i16,
}

impl Placement {
    pub const fn new(source: SourceId, x: i16, y: i16) -> Self {
        Self { source, x, y }
    }
}

#[derive(Debug, Clone)]
pub struct Composite {
    pub(crate) bounds: Bounds,
    pub(crate) children: Vec<Placement, MAX_CHILDREN>,
}

impl SourceGraph {
    /// Add a composite of the given size
    pub fn add_composite(
        &mut self,
        bounds: Bounds,
        children: &[Placement],
    ) -> Result<SourceId, GraphError> {
        for child in children {
            self.check(child.source)?;
        }
        let children = Vec::from_slice(children)
            .map_err(|_| GraphError::CapacityExceeded(Capacity::Children))?;
        self.insert(NodeKind::Composite(Composite { bounds, children }))
    }

    /// Append a child on top of the existing ones
    pub fn add_child(&mut self, composite: SourceId, placement: Placement) -> Result<(), GraphError> {
        self.check(placement.source)?;
        let visible = self.lifecycle(composite).is_visible();
        let node = self.node_mut(composite).ok_or(GraphError::UnknownSource)?;
        let NodeKind::Composite(c) = &mut node.kind else {
            return Err(GraphError::WrongKind);
        };
        c.children
            .push(placement)
            .map_err(|_| GraphError::CapacityExceeded(Capacity::Children))?;
        node.valid = false;
        if visible {
            self.set_visible(placement.source, true);
        }
        Ok(())
    }

    pub(crate) fn query_composite(&self, composite: &Composite, x: i16, y: i16, depth: u8) -> bool {
        if !composite.bounds.contains(x, y) {
            return false;
        }
        for child in composite.children.iter().rev() {
            let (lx, ly) = (x - child.x, y - child.y);
            if self.bounds_at(child.source, depth + 1).contains(lx, ly) {
                return self.query_at(child.source, lx, ly, depth + 1);
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, InputResponse};
    use crate::source::{LeafKind, Lifecycle};

    fn digit(graph: &mut SourceGraph, width: u8, height: u8) -> SourceId {
        graph.add_leaf(LeafKind::Counter(8), width, height).unwrap()
    }

    #[test]
    fn test_capacity() {
        let mut graph = SourceGraph::new();
        let leaf = digit(&mut graph, 5, 7);
        let placements = [Placement::new(leaf, 0, 0); MAX_CHILDREN + 1];
        assert_eq!(
            graph.add_composite(Bounds::new(40, 7), &placements),
            Err(GraphError::CapacityExceeded(Capacity::Children))
        );
        let c = graph
            .add_composite(Bounds::new(40, 7), &placements[..MAX_CHILDREN])
            .unwrap();
        assert_eq!(
            graph.add_child(c, Placement::new(leaf, 0, 0)),
            Err(GraphError::CapacityExceeded(Capacity::Children))
        );
    }

    #[test]
    fn test_children_are_offset() {
        let mut graph = SourceGraph::new();
        let leaf = digit(&mut graph, 5, 7);
        let c = graph
            .add_composite(Bounds::new(40, 7), &[Placement::new(leaf, 10, 0)])
            .unwrap();
        graph.ensure_valid(c, false);

        for x in 0..5 {
            for y in 0..7 {
                assert_eq!(graph.query(c, x + 10, y), graph.query(leaf, x, y));
            }
        }
        assert!((0..10).all(|x| (0..7).all(|y| !graph.query(c, x, y))));
    }

    #[test]
    fn test_later_child_paints_over() {
        let mut graph = SourceGraph::new();
        let eight = digit(&mut graph, 5, 7);
        let blank = graph.add_leaf(LeafKind::label(""), 5, 7).unwrap();
        let c = graph
            .add_composite(
                Bounds::new(40, 7),
                &[Placement::new(eight, 0, 0), Placement::new(blank, 0, 0)],
            )
            .unwrap();
        graph.ensure_valid(c, false);
        assert!(graph.leaf(eight).unwrap().bitmap().any());
        // The empty label on top hides the digit entirely
        assert!((0..5).all(|x| (0..7).all(|y| !graph.query(c, x, y))));
    }

    #[test]
    fn test_out_of_bounds_query() {
        let mut graph = SourceGraph::new();
        let leaf = digit(&mut graph, 40, 7);
        let c = graph
            .add_composite(Bounds::new(4, 4), &[Placement::new(leaf, 0, 0)])
            .unwrap();
        graph.ensure_valid(c, false);
        for (x, y) in [(-1, 0), (0, -1), (4, 0), (0, 4), (100, 100)] {
            assert!(!graph.query(c, x, y));
        }
    }

    #[test]
    fn test_validity_is_union_of_children() {
        let mut graph = SourceGraph::new();
        let a = graph.add_leaf(LeafKind::Counter(1), 5, 7).unwrap();
        let b = graph.add_leaf(LeafKind::Counter(2), 5, 7).unwrap();
        let c = graph
            .add_composite(
                Bounds::new(10, 7),
                &[Placement::new(a, 0, 0), Placement::new(b, 5, 0)],
            )
            .unwrap();

        assert!(graph.ensure_valid(c, false));
        assert!(graph.is_valid(c));

        graph.set_counter(b, 3).unwrap();
        assert!(!graph.is_valid(c));
        let cached: [bool; 35] = core::array::from_fn(|i| graph.query(c, 5 + (i / 7) as i16, (i % 7) as i16));

        graph.ensure_valid(c, false);
        assert!(graph.is_valid(c));
        let fresh: [bool; 35] = core::array::from_fn(|i| graph.query(c, 5 + (i / 7) as i16, (i % 7) as i16));
        assert_ne!(cached, fresh);
    }

    #[test]
    fn test_blank_child_makes_composite_report_no_content() {
        let mut graph = SourceGraph::new();
        let a = graph.add_leaf(LeafKind::Counter(1), 5, 7).unwrap();
        let c = graph
            .add_composite(
                Bounds::new(10, 7),
                &[Placement::new(a, 0, 0), Placement::new(SourceId::BLANK, 5, 0)],
            )
            .unwrap();
        assert!(!graph.ensure_valid(c, false));
    }

    #[test]
    fn test_lifecycle_forwarding() {
        let mut graph = SourceGraph::new();
        let a = graph.add_leaf(LeafKind::probe(), 5, 7).unwrap();
        let b = graph.add_leaf(LeafKind::probe(), 5, 7).unwrap();
        let c = graph
            .add_composite(
                Bounds::new(10, 7),
                &[Placement::new(a, 0, 0), Placement::new(b, 5, 0)],
            )
            .unwrap();

        graph.set_focused(c, true);
        assert_eq!(graph.lifecycle(a), Lifecycle::Focused);
        assert_eq!(graph.lifecycle(b), Lifecycle::Visible);

        graph.set_visible(c, false);
        assert_eq!(graph.lifecycle(a), Lifecycle::Invisible);
        assert_eq!(graph.lifecycle(b), Lifecycle::Invisible);
    }

    #[test]
    fn test_input_goes_to_first_child() {
        let mut graph = SourceGraph::new();
        let a = graph.add_leaf(LeafKind::Counter(5), 5, 7).unwrap();
        let b = graph.add_leaf(LeafKind::Counter(6), 5, 7).unwrap();
        let c = graph
            .add_composite(
                Bounds::new(10, 7),
                &[Placement::new(a, 0, 0), Placement::new(b, 5, 0)],
            )
            .unwrap();
        assert_eq!(graph.handle_input(c, InputEvent::Center), InputResponse::Handled);
        assert_eq!(graph.leaf(a).unwrap().kind(), &LeafKind::Counter(0));
        assert_eq!(graph.leaf(b).unwrap().kind(), &LeafKind::Counter(6));
    }
}
