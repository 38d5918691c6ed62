//! Countdown task
//!
//! Ticks the timer leaf once a second. The leaf only counts while it is
//! running, so the task can tick unconditionally.

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::channels::shutdown_requested;
use crate::context::AppContext;

#[embassy_executor::task]
pub async fn countdown_task(ctx: &'static AppContext) {
    info!("Countdown task started");

    let mut ticker = Ticker::every(Duration::from_secs(1));
    loop {
        ticker.next().await;
        if shutdown_requested() {
            return;
        }
        match ctx.graph.with(|graph| graph.tick_countdown(ctx.tree.countdown)) {
            Ok(true) => trace!("Countdown ticked"),
            Ok(false) => {}
            Err(e) => {
                warn!("Failed to tick countdown: {:?}", e);
                return;
            }
        }
    }
}
