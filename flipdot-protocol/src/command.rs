//! Controller-side command encoder
//!
//! Commands are appended to a fixed-capacity byte buffer that the caller
//! drains to the UART. A failed write leaves the buffer exactly as it was
//! before the call.

use heapless::Vec;

use crate::register::{ControlByte, ModuleAddress, Orientation, Register, DATA_MASK};

/// Protocol encode errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Module address outside 0-7
    InvalidAddress,
    /// Register cannot be selected or does not accept data
    InvalidRegister,
    /// Value does not fit in 7 bits
    ValueOutOfRange,
    /// Output buffer has no room left
    BufferFull,
}

impl TryFrom<u8> for ModuleAddress {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ModuleAddress::new(value).ok_or(ProtocolError::InvalidAddress)
    }
}

/// Byte buffer of encoded commands
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer<const N: usize> {
    bytes: Vec<u8, N>,
}

impl<const N: usize> CommandBuffer<N> {
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Append a control byte selecting `register` on `address`
    pub fn select(&mut self, address: ModuleAddress, register: Register) -> Result<(), ProtocolError> {
        let byte = ControlByte::new(address, register)
            .to_byte()
            .ok_or(ProtocolError::InvalidRegister)?;
        self.push(byte)
    }

    /// Append a 7-bit data byte
    pub fn data(&mut self, value: u8) -> Result<(), ProtocolError> {
        if value > DATA_MASK {
            return Err(ProtocolError::ValueOutOfRange);
        }
        self.push(value)
    }

    /// Write consecutive frame registers starting at `start`
    ///
    /// The module auto-advances after each data byte, so only one control
    /// byte is emitted.
    pub fn write_frame(
        &mut self,
        address: ModuleAddress,
        start: u8,
        values: &[u8],
    ) -> Result<(), ProtocolError> {
        if values.iter().any(|&v| v > DATA_MASK) {
            return Err(ProtocolError::ValueOutOfRange);
        }
        self.atomically(|buf| {
            buf.select(address, Register::Frame(start))?;
            for &value in values {
                buf.push(value)?;
            }
            Ok(())
        })
    }

    /// Force a full redraw of the module
    pub fn commit(&mut self, address: ModuleAddress) -> Result<(), ProtocolError> {
        self.select(address, Register::Commit)
    }

    /// Send the orientation register
    pub fn configure(
        &mut self,
        address: ModuleAddress,
        orientation: Orientation,
    ) -> Result<(), ProtocolError> {
        self.write_register(address, Register::Orientation, orientation.to_bits())
    }

    /// Send the framerate register
    pub fn set_framerate(&mut self, address: ModuleAddress, framerate: u8) -> Result<(), ProtocolError> {
        self.write_register(address, Register::Framerate, framerate)
    }

    /// Encoded bytes so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    fn write_register(
        &mut self,
        address: ModuleAddress,
        register: Register,
        value: u8,
    ) -> Result<(), ProtocolError> {
        if value > DATA_MASK {
            return Err(ProtocolError::ValueOutOfRange);
        }
        self.atomically(|buf| {
            buf.select(address, register)?;
            buf.push(value)
        })
    }

    fn push(&mut self, byte: u8) -> Result<(), ProtocolError> {
        self.bytes.push(byte).map_err(|_| ProtocolError::BufferFull)
    }

    fn atomically(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<(), ProtocolError>,
    ) -> Result<(), ProtocolError> {
        let mark = self.bytes.len();
        let result = f(self);
        if result.is_err() {
            self.bytes.truncate(mark);
        }
        result
    }
}
