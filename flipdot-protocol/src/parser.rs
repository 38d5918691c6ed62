//! Driver-side byte stream decoder
//!
//! Reproduces how a driver board consumes the shared serial line: it only
//! reacts to control bytes carrying its own address, frame register writes
//! auto-advance and wrap, and a commit selector deselects the module after
//! requesting a full redraw.
//!
//! The parser also keeps the last value written to every register so the
//! controller's output can be checked against the picture a module would
//! actually hold.

use crate::register::{ControlByte, ModuleAddress, Orientation, Register, FRAME_REGISTER_COUNT};

/// Something a module does in response to a byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModuleEvent {
    /// A frame register received a value
    FrameWrite { register: u8, value: u8 },
    /// Commit selector seen, module redraws every pixel
    FullRedraw,
    /// Orientation register written
    OrientationSet(Orientation),
    /// Framerate register written
    FramerateSet(u8),
}

/// State machine for a single module
#[derive(Debug, Clone)]
pub struct ModuleParser {
    address: ModuleAddress,
    selected: Option<Register>,
    frame: [u8; FRAME_REGISTER_COUNT as usize],
    orientation: Orientation,
    framerate: Option<u8>,
}

impl ModuleParser {
    pub fn new(address: ModuleAddress) -> Self {
        Self {
            address,
            selected: None,
            frame: [0; FRAME_REGISTER_COUNT as usize],
            orientation: Orientation::default(),
            framerate: None,
        }
    }

    /// Feed one byte from the line
    pub fn feed(&mut self, byte: u8) -> Option<ModuleEvent> {
        if byte & crate::register::CONTROL_FLAG != 0 {
            return self.handle_control(byte);
        }

        let register = self.selected?;
        match register {
            Register::Frame(r) => {
                self.frame[r as usize] = byte;
                self.selected = Some(register.advance());
                Some(ModuleEvent::FrameWrite { register: r, value: byte })
            }
            Register::Orientation => {
                self.orientation = Orientation::from_bits(byte);
                Some(ModuleEvent::OrientationSet(self.orientation))
            }
            Register::Framerate => {
                self.framerate = Some(byte);
                Some(ModuleEvent::FramerateSet(byte))
            }
            Register::Commit => None,
        }
    }

    /// Feed a slice, calling `on_event` for every resulting event
    pub fn feed_all(&mut self, bytes: &[u8], mut on_event: impl FnMut(ModuleEvent)) {
        for &byte in bytes {
            if let Some(event) = self.feed(byte) {
                on_event(event);
            }
        }
    }

    fn handle_control(&mut self, byte: u8) -> Option<ModuleEvent> {
        if ControlByte::address_of(byte) != self.address {
            self.selected = None;
            return None;
        }

        match ControlByte::from_byte(byte).map(|c| c.register) {
            Some(Register::Commit) => {
                self.selected = None;
                Some(ModuleEvent::FullRedraw)
            }
            Some(register) => {
                self.selected = Some(register);
                None
            }
            // Reserved selectors
            None => {
                self.selected = None;
                None
            }
        }
    }

    pub fn address(&self) -> ModuleAddress {
        self.address
    }

    /// Currently selected register, if the module is listening
    pub fn selected(&self) -> Option<Register> {
        self.selected
    }

    /// Raw frame register contents
    pub fn frame(&self) -> &[u8; FRAME_REGISTER_COUNT as usize] {
        &self.frame
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn framerate(&self) -> Option<u8> {
        self.framerate
    }
}
