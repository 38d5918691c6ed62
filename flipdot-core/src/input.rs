//! Button input events and handler responses

use crate::source::SourceId;

/// A single button press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    Up,
    Down,
    Left,
    Right,
    Center,
}

/// What a source did with an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputResponse {
    /// Not consumed, the parent may act on it
    Ignored,
    /// Consumed
    Handled,
    /// The activity asks its stack to finish it
    Finish,
    /// Ask the enclosing stack to push this activity
    Launch(SourceId),
}

impl InputResponse {
    pub fn is_ignored(self) -> bool {
        self == InputResponse::Ignored
    }
}
