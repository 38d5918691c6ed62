//! Counter task: one tick every 100 ms

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::channels::shutdown_requested;
use crate::context::AppContext;

const COUNTER_INTERVAL_MS: u64 = 100;

#[embassy_executor::task]
pub async fn counter_task(ctx: &'static AppContext) {
    info!("Counter task started");

    let mut ticker = Ticker::every(Duration::from_millis(COUNTER_INTERVAL_MS));
    loop {
        ticker.next().await;
        if shutdown_requested() {
            return;
        }
        if let Err(e) = ctx.graph.with(|graph| graph.increment_counter(ctx.tree.counter)) {
            warn!("Failed to advance counter: {:?}", e);
            return;
        }
    }
}
