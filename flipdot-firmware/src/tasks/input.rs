//! Button polling task
//!
//! Polls the five navigation buttons, debounces them and forwards presses
//! to the navigation task. Holding Center requests shutdown.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};

use flipdot_core::InputEvent;

use crate::button::ButtonState;
use crate::channels::{request_shutdown, shutdown_requested, INPUT_CHANNEL};

const POLL_INTERVAL_MS: u64 = 10;

/// Position of Center in the polling order
const CENTER: usize = 4;

/// Hold time on Center that stops the controller
const SHUTDOWN_HOLD_MS: u64 = 3000;

/// Navigation buttons, active-low with pull-ups
pub struct Buttons {
    pub up: Input<'static>,
    pub down: Input<'static>,
    pub left: Input<'static>,
    pub right: Input<'static>,
    pub center: Input<'static>,
}

#[embassy_executor::task]
pub async fn input_task(buttons: Buttons) {
    info!("Input task started");

    let pins = [
        (&buttons.up, InputEvent::Up),
        (&buttons.down, InputEvent::Down),
        (&buttons.left, InputEvent::Left),
        (&buttons.right, InputEvent::Right),
        (&buttons.center, InputEvent::Center),
    ];
    let mut states = [ButtonState::new(); 5];
    let shutdown_hold = Duration::from_millis(SHUTDOWN_HOLD_MS);

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));
    loop {
        ticker.next().await;
        if shutdown_requested() {
            info!("Input task stopped");
            return;
        }

        for ((pin, event), state) in pins.iter().zip(states.iter_mut()) {
            if !state.just_pressed(pin.is_low()) {
                continue;
            }
            debug!("Button {:?}", event);
            if INPUT_CHANNEL.try_send(*event).is_err() {
                warn!("Input channel full, dropping {:?}", event);
            }
        }

        if states[CENTER].held_for().is_some_and(|held| held >= shutdown_hold) {
            warn!("Center held, shutting down");
            request_shutdown();
        }
    }
}
