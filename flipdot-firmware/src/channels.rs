//! Inter-task communication
//!
//! Button presses travel to the navigation task over a channel. Shutdown is
//! a single flag every task checks after it wakes.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use portable_atomic::{AtomicBool, Ordering};

use flipdot_core::InputEvent;

/// Channel capacity for button events
const INPUT_CHANNEL_SIZE: usize = 8;

/// Debounced button presses, oldest first
pub static INPUT_CHANNEL: Channel<CriticalSectionRawMutex, InputEvent, INPUT_CHANNEL_SIZE> =
    Channel::new();

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Ask every task to stop after its current sleep
pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::Release);
}

pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::Acquire)
}
