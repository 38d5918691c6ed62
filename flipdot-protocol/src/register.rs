//! Control byte layout, register selectors and module orientation.
//!
//! Control byte:
//! - bit 7: always set (distinguishes control from data bytes)
//! - bits 6-4: module address
//! - bits 3-0: register selector

/// Bit that marks a control byte
pub const CONTROL_FLAG: u8 = 0x80;

/// Mask for the 7-bit payload of a data byte
pub const DATA_MASK: u8 = 0x7F;

/// Highest addressable module (3-bit address)
pub const MAX_MODULE_ADDRESS: u8 = 7;

/// Number of auto-advancing frame registers (0-6)
pub const FRAME_REGISTER_COUNT: u8 = 7;

const ADDRESS_SHIFT: u8 = 4;
const ADDRESS_MASK: u8 = 0b0111_0000;
const REGISTER_MASK: u8 = 0b0000_1111;

const REG_COMMIT: u8 = 7;
const REG_ORIENTATION: u8 = 8;
const REG_FRAMERATE: u8 = 9;

/// Address of one driver board on the shared line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModuleAddress(u8);

impl ModuleAddress {
    /// Create an address, rejecting anything outside 0-7
    pub const fn new(address: u8) -> Option<Self> {
        if address <= MAX_MODULE_ADDRESS {
            Some(Self(address))
        } else {
            None
        }
    }

    /// Raw address value
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Register selector carried by a control byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Frame register 0-6 (one column in column raster mode)
    Frame(u8),
    /// Force a full redraw of the module
    Commit,
    /// Orientation configuration
    Orientation,
    /// Framerate setting
    Framerate,
}

impl Register {
    /// Decode a 4-bit register selector
    ///
    /// Selectors 10-15 are reserved and decode to `None`.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & REGISTER_MASK {
            r if r < FRAME_REGISTER_COUNT => Some(Register::Frame(r)),
            REG_COMMIT => Some(Register::Commit),
            REG_ORIENTATION => Some(Register::Orientation),
            REG_FRAMERATE => Some(Register::Framerate),
            _ => None,
        }
    }

    /// Encode to the 4-bit register selector
    ///
    /// Returns `None` for a frame register outside 0-6.
    pub fn to_bits(self) -> Option<u8> {
        match self {
            Register::Frame(r) if r < FRAME_REGISTER_COUNT => Some(r),
            Register::Frame(_) => None,
            Register::Commit => Some(REG_COMMIT),
            Register::Orientation => Some(REG_ORIENTATION),
            Register::Framerate => Some(REG_FRAMERATE),
        }
    }

    /// Whether a data byte may follow this selector
    pub fn accepts_data(self) -> bool {
        !matches!(self, Register::Commit)
    }

    /// Next frame register after an auto-advancing write
    pub fn advance(self) -> Self {
        match self {
            Register::Frame(r) if r + 1 >= FRAME_REGISTER_COUNT => Register::Frame(0),
            Register::Frame(r) => Register::Frame(r + 1),
            other => other,
        }
    }
}

/// A decoded control byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlByte {
    pub address: ModuleAddress,
    pub register: Register,
}

impl ControlByte {
    pub fn new(address: ModuleAddress, register: Register) -> Self {
        Self { address, register }
    }

    /// Encode to the wire byte `0b1AAARRRR`
    pub fn to_byte(self) -> Option<u8> {
        let register = self.register.to_bits()?;
        Some(CONTROL_FLAG | (self.address.value() << ADDRESS_SHIFT) | register)
    }

    /// Decode a wire byte
    ///
    /// Returns `None` for data bytes and reserved register selectors.
    pub fn from_byte(byte: u8) -> Option<Self> {
        if !is_control(byte) {
            return None;
        }
        let address = ModuleAddress((byte & ADDRESS_MASK) >> ADDRESS_SHIFT);
        let register = Register::from_bits(byte)?;
        Some(Self { address, register })
    }

    /// Extract only the address bits of a control byte
    pub fn address_of(byte: u8) -> ModuleAddress {
        ModuleAddress((byte & ADDRESS_MASK) >> ADDRESS_SHIFT)
    }
}

/// Returns true if `byte` is a control byte
pub const fn is_control(byte: u8) -> bool {
    byte & CONTROL_FLAG != 0
}

/// How frame registers map onto the module's pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RasterMode {
    /// Registers hold rows (5 significant bits)
    #[default]
    Rows,
    /// Registers hold columns (7 significant bits)
    Columns,
}

/// Bit alignment of row data in row raster mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Justification {
    #[default]
    Lsb,
    Msb,
}

/// Which bit represents the leftmost pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HorizontalDirection {
    #[default]
    LsbLeft,
    MsbLeft,
}

/// Which bit represents the bottom pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VerticalDirection {
    #[default]
    LsbBottom,
    MsbBottom,
}

/// Orientation register (register 8) contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Orientation {
    pub raster: RasterMode,
    pub justification: Justification,
    pub horizontal: HorizontalDirection,
    pub vertical: VerticalDirection,
}

impl Orientation {
    /// Column registers, top pixel in bit 0
    ///
    /// This is what the controller sends at start-up: bit `y` of each
    /// column byte is row `y` counted from the top of the wall.
    pub const fn columns_top_down() -> Self {
        Self {
            raster: RasterMode::Columns,
            justification: Justification::Lsb,
            horizontal: HorizontalDirection::LsbLeft,
            vertical: VerticalDirection::MsbBottom,
        }
    }

    /// Encode to the 4 configuration bits
    pub fn to_bits(self) -> u8 {
        let mut bits = 0;
        if self.raster == RasterMode::Columns {
            bits |= 1 << 0;
        }
        if self.justification == Justification::Msb {
            bits |= 1 << 1;
        }
        if self.horizontal == HorizontalDirection::MsbLeft {
            bits |= 1 << 2;
        }
        if self.vertical == VerticalDirection::MsbBottom {
            bits |= 1 << 3;
        }
        bits
    }

    /// Decode from a register value (upper bits ignored)
    pub fn from_bits(bits: u8) -> Self {
        Self {
            raster: if bits & (1 << 0) != 0 {
                RasterMode::Columns
            } else {
                RasterMode::Rows
            },
            justification: if bits & (1 << 1) != 0 {
                Justification::Msb
            } else {
                Justification::Lsb
            },
            horizontal: if bits & (1 << 2) != 0 {
                HorizontalDirection::MsbLeft
            } else {
                HorizontalDirection::LsbLeft
            },
            vertical: if bits & (1 << 3) != 0 {
                VerticalDirection::MsbBottom
            } else {
                VerticalDirection::LsbBottom
            },
        }
    }
}
