//! Flip-dot driver-board serial protocol
//!
//! This crate defines the byte protocol between the display controller and
//! the driver boards. Each driver board owns one module of the wall and
//! listens on a shared UART line (115200 baud, 8N1).
//!
//! # Protocol Overview
//!
//! Every byte is either a control byte or a data byte:
//! ```text
//! control:  1 A A A R R R R     AAA  = module address (0-7)
//!                               RRRR = register selector
//! data:     0 V V V V V V V     VVVVVVV = 7-bit register value
//! ```
//!
//! | Register | Meaning                                                    |
//! |----------|------------------------------------------------------------|
//! | 0-6      | Frame registers, auto-advance after each write, wrap at 6  |
//! | 7        | Commit: force a full redraw of the module (no data byte)   |
//! | 8        | Orientation configuration                                  |
//! | 9        | Framerate (per-pixel energize time)                        |
//!
//! The encoding is bit-exact with the existing driver-board firmware and must
//! not change.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod parser;
pub mod register;

pub use command::{CommandBuffer, ProtocolError};
pub use parser::{ModuleEvent, ModuleParser};
pub use register::{
    ControlByte, HorizontalDirection, Justification, ModuleAddress, Orientation, RasterMode,
    Register, VerticalDirection, CONTROL_FLAG, DATA_MASK, FRAME_REGISTER_COUNT,
    MAX_MODULE_ADDRESS,
};
