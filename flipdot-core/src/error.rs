//! Graph construction and runtime errors

/// Fixed-capacity collection that overflowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Capacity {
    /// Node arena
    Sources,
    /// Composite children
    Children,
    /// Menu navigation nodes
    MenuItems,
    /// Activities on one stack
    StackDepth,
    /// Stacks behind a switcher
    Stacks,
}

/// Errors reported by [`SourceGraph`](crate::graph::SourceGraph) operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GraphError {
    /// A fixed-size collection is full
    CapacityExceeded(Capacity),
    /// Scroller instruction queue is full
    QueueFull,
    /// Handle does not name a node of this graph
    UnknownSource,
    /// Handle names a node of the wrong variant for this operation
    WrongKind,
    /// Collection has no entry the operation could use
    Empty,
    /// Index past the end of a collection
    OutOfRange,
    /// Activity is already on the stack
    AlreadyOnStack,
}
