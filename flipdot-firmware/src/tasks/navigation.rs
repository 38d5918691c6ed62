//! Navigation task
//!
//! Delivers button presses to the root of the tree. Every press is handled
//! inside one graph lock, so the scroll instructions it queues are visible
//! to the animation tasks as a whole.

use defmt::*;
use embassy_time::{with_timeout, Duration};

use crate::channels::{shutdown_requested, INPUT_CHANNEL};
use crate::context::AppContext;

/// Longest wait for a press before checking for shutdown
const RECEIVE_TIMEOUT_MS: u64 = 100;

#[embassy_executor::task]
pub async fn navigation_task(ctx: &'static AppContext) {
    info!("Navigation task started");

    let receiver = INPUT_CHANNEL.receiver();
    let timeout = Duration::from_millis(RECEIVE_TIMEOUT_MS);
    loop {
        let received = with_timeout(timeout, receiver.receive()).await;
        if shutdown_requested() {
            info!("Navigation task stopped");
            return;
        }
        let Ok(event) = received else {
            continue;
        };

        let response = ctx
            .graph
            .with(|graph| graph.handle_input(ctx.tree.root, event));
        debug!("{:?} -> {:?}", event, response);
    }
}
