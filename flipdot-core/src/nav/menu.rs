//! Sub-menus and the launcher
//!
//! A menu is two scrollers. The selector pages through the covers along the
//! menu axis; the frame runs on the perpendicular axis and swaps between
//! the selector and the content of the selected entry.
//!
//! Input goes to whatever is on screen first. While drilled in, the
//! content gets first refusal; then [`BACK_EVENT`] or the frame's back
//! button drills out. [`BACK_EVENT`] is the same at every nesting level,
//! so menus on different axes can always be left.
//! At the top level the cover gets first refusal, then the selector keys
//! move the selection and the frame's forward button (or centre) drills in.
//! A selector key at either end is ignored so an enclosing stack switcher
//! can act on it.

use heapless::Vec;

use super::activity::BACK_EVENT;
use super::NavigationNode;
use crate::config::MAX_MENU_ITEMS;
use crate::error::{Capacity, GraphError};
use crate::graph::{NodeKind, SourceGraph};
use crate::input::{InputEvent, InputResponse};
use crate::scroll::{Axis, Direction, ScrollInstruction};
use crate::source::{Bounds, SourceId};

#[derive(Debug, Clone)]
pub struct SubMenu {
    pub(crate) axis: Axis,
    pub(crate) bounds: Bounds,
    pub(crate) items: Vec<NavigationNode, MAX_MENU_ITEMS>,
    pub(crate) selector: SourceId,
    pub(crate) frame: SourceId,
    pub(crate) selected: usize,
    pub(crate) active_content_index: Option<usize>,
    /// Root menu: back resets to the first cover instead of bubbling up
    pub(crate) launcher: bool,
}

impl SubMenu {
    fn frame_axis(&self) -> Axis {
        self.axis.perpendicular()
    }

    fn cover(&self, index: usize) -> SourceId {
        self.items
            .get(index)
            .map(|n| n.cover)
            .unwrap_or(SourceId::BLANK)
    }

    fn content(&self, index: usize) -> Option<SourceId> {
        self.items.get(index).and_then(|n| n.content)
    }
}

/// Read-only view of a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuState {
    pub selected: usize,
    pub active_content_index: Option<usize>,
    pub items: usize,
    pub launcher: bool,
    pub selector: SourceId,
    pub frame: SourceId,
}

impl MenuState {
    pub fn is_drilled(&self) -> bool {
        self.active_content_index.is_some()
    }
}

impl SourceGraph {
    /// Add a menu over `items`, paging along `axis`
    ///
    /// A launcher is made visible straight away.
    pub fn add_menu(
        &mut self,
        axis: Axis,
        bounds: Bounds,
        items: &[NavigationNode],
        launcher: bool,
    ) -> Result<SourceId, GraphError> {
        let first = items.first().ok_or(GraphError::Empty)?;
        for item in items {
            self.check(item.cover)?;
            if let Some(content) = item.content {
                self.check(content)?;
            }
        }
        let items =
            Vec::from_slice(items).map_err(|_| GraphError::CapacityExceeded(Capacity::MenuItems))?;

        let selector = self.add_scroller(axis, bounds, first.cover)?;
        let frame = self.add_scroller(axis.perpendicular(), bounds, selector)?;
        let id = self.insert(NodeKind::Menu(SubMenu {
            axis,
            bounds,
            items,
            selector,
            frame,
            selected: 0,
            active_content_index: None,
            launcher,
        }))?;
        if launcher {
            self.set_visible(id, true);
        }
        Ok(id)
    }

    fn menu(&self, id: SourceId) -> Result<&SubMenu, GraphError> {
        match &self.node(id).ok_or(GraphError::UnknownSource)?.kind {
            NodeKind::Menu(m) => Ok(m),
            _ => Err(GraphError::WrongKind),
        }
    }

    fn menu_mut(&mut self, id: SourceId) -> Result<&mut SubMenu, GraphError> {
        match &mut self.node_mut(id).ok_or(GraphError::UnknownSource)?.kind {
            NodeKind::Menu(m) => Ok(m),
            _ => Err(GraphError::WrongKind),
        }
    }

    pub fn menu_state(&self, id: SourceId) -> Option<MenuState> {
        let m = self.menu(id).ok()?;
        Some(MenuState {
            selected: m.selected,
            active_content_index: m.active_content_index,
            items: m.items.len(),
            launcher: m.launcher,
            selector: m.selector,
            frame: m.frame,
        })
    }

    pub(crate) fn menu_input(&mut self, id: SourceId, event: InputEvent, depth: u8) -> InputResponse {
        let Ok(menu) = self.menu(id).cloned() else {
            return InputResponse::Ignored;
        };
        let back = menu.frame_axis().previous_event();

        if let Some(index) = menu.active_content_index {
            if let Some(content) = menu.content(index) {
                let response = self.handle_input_at(content, event, depth);
                if !response.is_ignored() {
                    return response;
                }
            }
            return if event == back || event == BACK_EVENT {
                self.drill_out(id, &menu)
            } else {
                InputResponse::Ignored
            };
        }

        let response = self.handle_input_at(menu.cover(menu.selected), event, depth);
        if !response.is_ignored() {
            return response;
        }

        if event == menu.axis.previous_event() {
            self.move_selection(id, &menu, Direction::Backward)
        } else if event == menu.axis.next_event() {
            self.move_selection(id, &menu, Direction::Forward)
        } else if event == menu.frame_axis().next_event() || event == InputEvent::Center {
            self.drill_in(id, &menu)
        } else if event == back && menu.launcher {
            self.reset_launcher(id, &menu)
        } else {
            InputResponse::Ignored
        }
    }

    fn move_selection(&mut self, id: SourceId, menu: &SubMenu, direction: Direction) -> InputResponse {
        let next = match direction {
            Direction::Forward => (menu.selected + 1).min(menu.items.len() - 1),
            Direction::Backward => menu.selected.saturating_sub(1),
        };
        if next == menu.selected {
            return InputResponse::Ignored;
        }
        let page = menu.axis.length(menu.bounds);
        let instruction = ScrollInstruction::new(menu.cover(next), page, direction);
        if self.transition(menu.selector, instruction).is_err() {
            return InputResponse::Ignored;
        }
        if let Ok(m) = self.menu_mut(id) {
            m.selected = next;
        }
        InputResponse::Handled
    }

    fn drill_in(&mut self, id: SourceId, menu: &SubMenu) -> InputResponse {
        let Some(content) = menu.content(menu.selected) else {
            return InputResponse::Ignored;
        };
        let page = menu.frame_axis().length(menu.bounds);
        let instruction = ScrollInstruction::new(content, page, Direction::Forward);
        if self.transition(menu.frame, instruction).is_err() {
            return InputResponse::Ignored;
        }
        if let Ok(m) = self.menu_mut(id) {
            m.active_content_index = Some(menu.selected);
        }
        InputResponse::Handled
    }

    fn drill_out(&mut self, id: SourceId, menu: &SubMenu) -> InputResponse {
        let page = menu.frame_axis().length(menu.bounds);
        let instruction = ScrollInstruction::new(menu.selector, page, Direction::Backward);
        if self.transition(menu.frame, instruction).is_err() {
            return InputResponse::Ignored;
        }
        let reset = menu.launcher && menu.selected != 0;
        if reset && self.jump_to(menu.selector, menu.cover(0)).is_err() {
            return InputResponse::Ignored;
        }
        if let Ok(m) = self.menu_mut(id) {
            m.active_content_index = None;
            if reset {
                m.selected = 0;
            }
        }
        InputResponse::Handled
    }

    /// Back at the top of a launcher: page back to the first cover
    fn reset_launcher(&mut self, id: SourceId, menu: &SubMenu) -> InputResponse {
        if menu.selected == 0 {
            return InputResponse::Handled;
        }
        let page = menu.axis.length(menu.bounds);
        let instruction = ScrollInstruction::new(menu.cover(0), page, Direction::Backward);
        if self.transition(menu.selector, instruction).is_ok() {
            if let Ok(m) = self.menu_mut(id) {
                m.selected = 0;
            }
        }
        InputResponse::Handled
    }
}
