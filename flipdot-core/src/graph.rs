//! Source graph arena
//!
//! The graph owns every node of the display tree in a fixed-capacity arena.
//! Nodes refer to each other by [`SourceId`] handles and are never removed
//! individually, so handles cannot dangle; dropping the graph tears down the
//! whole tree.
//!
//! Variant behaviour is dispatched by `match` on [`NodeKind`]. Recursive
//! walks carry a depth counter and give up past [`MAX_NESTING`], so a cyclic
//! or absurdly deep reference renders off instead of overflowing the stack.

use heapless::Vec;

use crate::config::{AnimationConfig, MAX_CHILDREN, MAX_NESTING, MAX_SOURCES};
use crate::error::{Capacity, GraphError};
use crate::input::{InputEvent, InputResponse};
use crate::nav::{Activity, ActivityStack, StackSwitcher, SubMenu};
use crate::scroll::Scroller;
use crate::source::leaf::truncated;
use crate::source::{
    Bounds, ClockTime, Composite, Consumer, Leaf, LeafKind, Lifecycle, Placement, ProbeHook,
    ProbeState, SourceId,
};

/// One arena slot
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) lifecycle: Lifecycle,
    pub(crate) valid: bool,
    pub(crate) kind: NodeKind,
}

/// Source variants
#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Leaf(Leaf),
    Composite(Composite),
    Consumer(Consumer),
    Scroller(Scroller),
    Menu(SubMenu),
    Activity(Activity),
    Stack(ActivityStack),
    Switcher(StackSwitcher),
}

/// Handles a node forwards to, copied out so the arena can be mutated
/// while walking
enum Route {
    Leaf,
    Composite(Vec<Placement, MAX_CHILDREN>),
    Consumer(Option<SourceId>),
    Scroller {
        active: SourceId,
        inactive: SourceId,
        animating: bool,
        idle: bool,
    },
    /// Wrapper whose pixels and lifecycle come from one inner source
    View(SourceId),
}

/// Arena of pixel sources plus render bookkeeping
#[derive(Debug, Clone)]
pub struct SourceGraph {
    nodes: Vec<Node, MAX_SOURCES>,
    animation: AnimationConfig,
    full_redraw: bool,
}

impl Default for SourceGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceGraph {
    /// Create a graph with default animation tuning
    pub fn new() -> Self {
        Self::with_animation(AnimationConfig::default())
    }

    /// Create a graph holding only the blank placeholder
    pub fn with_animation(animation: AnimationConfig) -> Self {
        let mut nodes = Vec::new();
        // Capacity is non-zero, the first push cannot fail
        let _ = nodes.push(Node {
            lifecycle: Lifecycle::Invisible,
            valid: true,
            kind: NodeKind::Leaf(Leaf::new(LeafKind::Blank, 0, 0)),
        });
        Self {
            nodes,
            animation,
            full_redraw: true,
        }
    }

    pub fn animation(&self) -> &AnimationConfig {
        &self.animation
    }

    /// Number of nodes including the blank placeholder
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub(crate) fn insert(&mut self, kind: NodeKind) -> Result<SourceId, GraphError> {
        let id = SourceId::from_index(self.nodes.len());
        self.nodes
            .push(Node {
                lifecycle: Lifecycle::Invisible,
                valid: false,
                kind,
            })
            .map_err(|_| GraphError::CapacityExceeded(Capacity::Sources))?;
        Ok(id)
    }

    pub(crate) fn node(&self, id: SourceId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node_mut(&mut self, id: SourceId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub(crate) fn contains(&self, id: SourceId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Every scroller in the graph, in creation order
    pub fn scrollers(&self) -> impl Iterator<Item = SourceId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| matches!(node.kind, NodeKind::Scroller(_)))
            .map(|(index, _)| SourceId::from_index(index))
    }

    pub(crate) fn check(&self, id: SourceId) -> Result<(), GraphError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(GraphError::UnknownSource)
        }
    }

    // ---- Full redraw flag ----

    /// Ask the next render pass to rewrite every column
    pub fn request_full_redraw(&mut self) {
        self.full_redraw = true;
    }

    /// Consume the full redraw request
    pub fn take_full_redraw(&mut self) -> bool {
        core::mem::take(&mut self.full_redraw)
    }

    // ---- Leaves ----

    /// Add a leaf of the given size
    pub fn add_leaf(&mut self, kind: LeafKind, width: u8, height: u8) -> Result<SourceId, GraphError> {
        self.insert(NodeKind::Leaf(Leaf::new(kind, width, height)))
    }

    pub fn leaf(&self, id: SourceId) -> Option<&Leaf> {
        match &self.node(id)?.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Run `f` on a leaf and mark it invalid
    fn update_leaf<R>(
        &mut self,
        id: SourceId,
        f: impl FnOnce(&mut LeafKind) -> Option<R>,
    ) -> Result<R, GraphError> {
        let node = self.node_mut(id).ok_or(GraphError::UnknownSource)?;
        let NodeKind::Leaf(leaf) = &mut node.kind else {
            return Err(GraphError::WrongKind);
        };
        let result = f(&mut leaf.kind).ok_or(GraphError::WrongKind)?;
        node.valid = false;
        Ok(result)
    }

    /// Replace the text of a label or shortcut leaf
    pub fn set_label(&mut self, id: SourceId, text: &str) -> Result<(), GraphError> {
        self.update_leaf(id, |kind| match kind {
            LeafKind::Label(label) | LeafKind::Shortcut { label, .. } => {
                *label = truncated(text);
                Some(())
            }
            _ => None,
        })
    }

    pub fn set_counter(&mut self, id: SourceId, value: u32) -> Result<(), GraphError> {
        self.update_leaf(id, |kind| match kind {
            LeafKind::Counter(v) => {
                *v = value;
                Some(())
            }
            _ => None,
        })
    }

    /// Increment a counter leaf, returning the new value
    pub fn increment_counter(&mut self, id: SourceId) -> Result<u32, GraphError> {
        self.update_leaf(id, |kind| match kind {
            LeafKind::Counter(v) => {
                *v = v.wrapping_add(1);
                Some(*v)
            }
            _ => None,
        })
    }

    pub fn set_clock(&mut self, id: SourceId, time: Option<ClockTime>) -> Result<(), GraphError> {
        self.update_leaf(id, |kind| match kind {
            LeafKind::Clock(t) => {
                *t = time;
                Some(())
            }
            _ => None,
        })
    }

    /// Advance a countdown by one second; returns true if it changed
    pub fn tick_countdown(&mut self, id: SourceId) -> Result<bool, GraphError> {
        let node = self.node_mut(id).ok_or(GraphError::UnknownSource)?;
        let NodeKind::Leaf(leaf) = &mut node.kind else {
            return Err(GraphError::WrongKind);
        };
        if !matches!(leaf.kind, LeafKind::Countdown { .. }) {
            return Err(GraphError::WrongKind);
        }
        let changed = leaf.tick_countdown();
        if changed {
            node.valid = false;
        }
        Ok(changed)
    }

    /// Hook history of a probe leaf
    pub fn probe_state(&self, id: SourceId) -> Option<ProbeState> {
        match self.leaf(id)?.kind() {
            LeafKind::Probe(state) => Some(*state),
            _ => None,
        }
    }

    // ---- Dispatch ----

    fn route(&self, id: SourceId) -> Option<Route> {
        let route = match &self.node(id)?.kind {
            NodeKind::Leaf(_) => Route::Leaf,
            NodeKind::Composite(c) => Route::Composite(c.children.clone()),
            NodeKind::Consumer(c) => Route::Consumer(c.target),
            NodeKind::Scroller(s) => Route::Scroller {
                active: s.active,
                inactive: s.inactive,
                animating: s.in_flight,
                idle: s.is_idle(),
            },
            NodeKind::Menu(m) => Route::View(m.frame),
            NodeKind::Activity(a) => Route::View(a.content),
            NodeKind::Stack(s) => Route::View(s.switcher),
            NodeKind::Switcher(s) => Route::View(s.switcher),
        };
        Some(route)
    }

    /// Declared size of a source; unbound references have no area
    pub fn bounds(&self, id: SourceId) -> Bounds {
        self.bounds_at(id, 0)
    }

    pub(crate) fn bounds_at(&self, id: SourceId, depth: u8) -> Bounds {
        if depth > MAX_NESTING {
            return Bounds::default();
        }
        let Some(node) = self.node(id) else {
            return Bounds::default();
        };
        match &node.kind {
            NodeKind::Leaf(leaf) => Bounds::new(leaf.bitmap.width(), leaf.bitmap.height()),
            NodeKind::Composite(c) => c.bounds,
            NodeKind::Consumer(c) => match c.target {
                Some(target) => self.bounds_at(target, depth + 1),
                None => Bounds::default(),
            },
            NodeKind::Scroller(s) => s.bounds,
            NodeKind::Menu(m) => self.bounds_at(m.frame, depth + 1),
            NodeKind::Activity(a) => self.bounds_at(a.content, depth + 1),
            NodeKind::Stack(s) => self.bounds_at(s.switcher, depth + 1),
            NodeKind::Switcher(s) => self.bounds_at(s.switcher, depth + 1),
        }
    }

    /// Pixel value at `(x, y)`; off outside the source's bounds
    pub fn query(&self, id: SourceId, x: i16, y: i16) -> bool {
        self.query_at(id, x, y, 0)
    }

    pub(crate) fn query_at(&self, id: SourceId, x: i16, y: i16, depth: u8) -> bool {
        if depth > MAX_NESTING {
            return false;
        }
        let Some(node) = self.node(id) else {
            return false;
        };
        match &node.kind {
            NodeKind::Leaf(leaf) => leaf.bitmap.get(x as i32, y as i32),
            NodeKind::Composite(c) => self.query_composite(c, x, y, depth),
            NodeKind::Consumer(c) => match c.target {
                Some(target) => self.query_at(target, x, y, depth + 1),
                None => false,
            },
            NodeKind::Scroller(s) => self.query_scroller(s, x, y, depth),
            NodeKind::Menu(m) => self.query_at(m.frame, x, y, depth + 1),
            NodeKind::Activity(a) => self.query_at(a.content, x, y, depth + 1),
            NodeKind::Stack(s) => self.query_at(s.switcher, x, y, depth + 1),
            NodeKind::Switcher(s) => self.query_at(s.switcher, x, y, depth + 1),
        }
    }

    /// Recompute every invalid leaf below `id`
    ///
    /// Returns whether the source renders content. Composites return the AND
    /// of their children; scrollers report their active source.
    pub fn ensure_valid(&mut self, id: SourceId, include_inactive: bool) -> bool {
        self.ensure_valid_at(id, include_inactive, 0)
    }

    fn ensure_valid_at(&mut self, id: SourceId, include_inactive: bool, depth: u8) -> bool {
        if depth > MAX_NESTING {
            return false;
        }
        let Some(route) = self.route(id) else {
            return false;
        };
        let next = depth + 1;
        let result = match route {
            Route::Leaf => {
                let Some(node) = self.node_mut(id) else {
                    return false;
                };
                let NodeKind::Leaf(leaf) = &mut node.kind else {
                    return false;
                };
                if !node.valid {
                    leaf.redraw();
                }
                leaf.has_content()
            }
            Route::Composite(children) => {
                let mut all = true;
                for child in &children {
                    all &= self.ensure_valid_at(child.source, include_inactive, next);
                }
                all
            }
            Route::Consumer(Some(target)) => self.ensure_valid_at(target, include_inactive, next),
            Route::Consumer(None) => false,
            Route::Scroller {
                active,
                inactive,
                animating,
                ..
            } => {
                let result = self.ensure_valid_at(active, include_inactive, next);
                if animating || include_inactive {
                    self.ensure_valid_at(inactive, include_inactive, next);
                }
                result
            }
            Route::View(view) => self.ensure_valid_at(view, include_inactive, next),
        };
        if let Some(node) = self.node_mut(id) {
            node.valid = true;
        }
        result
    }

    /// Mark a node dirty; parents notice on their next `is_valid`
    pub fn invalidate(&mut self, id: SourceId) {
        if let Some(node) = self.node_mut(id) {
            node.valid = false;
        }
    }

    /// Whether the node and everything it shows are up to date
    pub fn is_valid(&self, id: SourceId) -> bool {
        self.is_valid_at(id, 0)
    }

    fn is_valid_at(&self, id: SourceId, depth: u8) -> bool {
        if depth > MAX_NESTING {
            return false;
        }
        let (Some(node), Some(route)) = (self.node(id), self.route(id)) else {
            return false;
        };
        let next = depth + 1;
        node.valid
            && match route {
                Route::Leaf => true,
                Route::Composite(children) => {
                    children.iter().all(|c| self.is_valid_at(c.source, next))
                }
                Route::Consumer(Some(target)) => self.is_valid_at(target, next),
                Route::Consumer(None) => false,
                Route::Scroller {
                    active,
                    inactive,
                    animating,
                    ..
                } => {
                    self.is_valid_at(active, next)
                        && (!animating || self.is_valid_at(inactive, next))
                }
                Route::View(view) => self.is_valid_at(view, next),
            }
    }

    // ---- Lifecycle ----

    pub fn lifecycle(&self, id: SourceId) -> Lifecycle {
        self.node(id).map(|n| n.lifecycle).unwrap_or_default()
    }

    fn set_lifecycle(&mut self, id: SourceId, lifecycle: Lifecycle) {
        if let Some(node) = self.node_mut(id) {
            node.lifecycle = lifecycle;
        }
    }

    /// Show or hide a source
    ///
    /// Entering visibility only fires from `Invisible`; hiding a focused
    /// source drops focus first.
    pub fn set_visible(&mut self, id: SourceId, visible: bool) {
        self.set_visible_at(id, visible, 0)
    }

    pub(crate) fn set_visible_at(&mut self, id: SourceId, visible: bool, depth: u8) {
        if depth > MAX_NESTING {
            return;
        }
        let current = self.lifecycle(id);
        match (current, visible) {
            (Lifecycle::Invisible, true) if self.contains(id) => {
                self.set_lifecycle(id, Lifecycle::Visible);
                self.run_hook(id, ProbeHook::EnterVisibility, depth);
            }
            (Lifecycle::Focused, false) => {
                self.set_focused_at(id, false, depth);
                self.set_lifecycle(id, Lifecycle::Invisible);
                self.run_hook(id, ProbeHook::ExitVisibility, depth);
            }
            (Lifecycle::Visible, false) => {
                self.set_lifecycle(id, Lifecycle::Invisible);
                self.run_hook(id, ProbeHook::ExitVisibility, depth);
            }
            _ => {}
        }
    }

    /// Give or take input focus
    ///
    /// Focusing makes the source visible first; unfocusing leaves it visible.
    pub fn set_focused(&mut self, id: SourceId, focused: bool) {
        self.set_focused_at(id, focused, 0)
    }

    pub(crate) fn set_focused_at(&mut self, id: SourceId, focused: bool, depth: u8) {
        if depth > MAX_NESTING || !self.contains(id) {
            return;
        }
        let current = self.lifecycle(id);
        match (current, focused) {
            (Lifecycle::Focused, false) => {
                self.set_lifecycle(id, Lifecycle::Visible);
                self.run_hook(id, ProbeHook::ExitFocus, depth);
            }
            (Lifecycle::Invisible | Lifecycle::Visible, true) => {
                self.set_visible_at(id, true, depth);
                self.set_lifecycle(id, Lifecycle::Focused);
                self.run_hook(id, ProbeHook::EnterFocus, depth);
            }
            _ => {}
        }
    }

    /// Apply one hook to another source
    fn forward_hook(&mut self, target: SourceId, hook: ProbeHook, depth: u8) {
        match hook {
            ProbeHook::EnterVisibility => self.set_visible_at(target, true, depth),
            ProbeHook::ExitVisibility => self.set_visible_at(target, false, depth),
            ProbeHook::EnterFocus => self.set_focused_at(target, true, depth),
            ProbeHook::ExitFocus => self.set_focused_at(target, false, depth),
        }
    }

    fn run_hook(&mut self, id: SourceId, hook: ProbeHook, depth: u8) {
        let Some(route) = self.route(id) else {
            return;
        };
        let next = depth + 1;
        match route {
            Route::Leaf => {
                let changed = match self.node_mut(id).map(|n| &mut n.kind) {
                    Some(NodeKind::Leaf(leaf)) => leaf.on_hook(hook),
                    _ => false,
                };
                if changed {
                    self.invalidate(id);
                }
            }
            Route::Composite(children) => match hook {
                ProbeHook::EnterVisibility | ProbeHook::ExitVisibility => {
                    for child in &children {
                        self.forward_hook(child.source, hook, next);
                    }
                }
                ProbeHook::EnterFocus | ProbeHook::ExitFocus => {
                    if let Some(first) = children.first() {
                        self.forward_hook(first.source, hook, next);
                    }
                }
            },
            Route::Consumer(Some(target)) | Route::View(target) => {
                self.forward_hook(target, hook, next)
            }
            Route::Consumer(None) => {}
            Route::Scroller {
                active,
                inactive,
                animating,
                idle,
            } => match hook {
                ProbeHook::EnterVisibility | ProbeHook::ExitVisibility => {
                    self.forward_hook(active, hook, next);
                    if animating {
                        self.forward_hook(inactive, hook, next);
                    }
                }
                ProbeHook::EnterFocus => {
                    if idle {
                        self.forward_hook(active, hook, next);
                    }
                }
                ProbeHook::ExitFocus => self.forward_hook(active, hook, next),
            },
        }
    }

    // ---- Input ----

    /// Deliver a button press to a source
    pub fn handle_input(&mut self, id: SourceId, event: InputEvent) -> InputResponse {
        self.handle_input_at(id, event, 0)
    }

    pub(crate) fn handle_input_at(
        &mut self,
        id: SourceId,
        event: InputEvent,
        depth: u8,
    ) -> InputResponse {
        if depth > MAX_NESTING {
            return InputResponse::Ignored;
        }
        let next = depth + 1;
        let Some(node) = self.node_mut(id) else {
            return InputResponse::Ignored;
        };
        match &mut node.kind {
            NodeKind::Leaf(leaf) => {
                let response = leaf.handle_input(event);
                if response == InputResponse::Handled {
                    node.valid = false;
                }
                response
            }
            NodeKind::Composite(c) => match c.children.first().map(|p| p.source) {
                Some(first) => self.handle_input_at(first, event, next),
                None => InputResponse::Ignored,
            },
            NodeKind::Consumer(c) => match c.target {
                Some(target) => self.handle_input_at(target, event, next),
                None => InputResponse::Ignored,
            },
            NodeKind::Scroller(s) => {
                let active = s.active;
                self.handle_input_at(active, event, next)
            }
            NodeKind::Menu(_) => self.menu_input(id, event, next),
            NodeKind::Activity(_) => self.activity_input(id, event, next),
            NodeKind::Stack(_) => self.stack_input(id, event, next),
            NodeKind::Switcher(_) => self.switcher_input(id, event, next),
        }
    }
}
