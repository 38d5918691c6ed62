//! Clock face task
//!
//! The controller has no RTC. The face counts from the configured start
//! time using the uptime clock, and shows the unknown-time pattern when no
//! start time is configured.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use flipdot_core::source::ClockTime;

use crate::channels::shutdown_requested;
use crate::context::AppContext;

const SECONDS_PER_DAY: u64 = 24 * 3600;

#[embassy_executor::task]
pub async fn clock_task(ctx: &'static AppContext) {
    info!("Clock task started");

    let Some(start) = ctx.config.clock.start_seconds() else {
        info!("Clock start time unknown");
        return;
    };

    let mut shown_minute = None;
    let mut ticker = Ticker::every(Duration::from_secs(1));
    loop {
        let seconds = (start as u64 + Instant::now().as_secs()) % SECONDS_PER_DAY;
        let minute = seconds / 60;
        if shown_minute != Some(minute) {
            shown_minute = Some(minute);
            let time = ClockTime::from_seconds(seconds as u32);
            if let Err(e) = ctx.graph.with(|graph| graph.set_clock(ctx.tree.clock, Some(time))) {
                warn!("Failed to update clock: {:?}", e);
            }
        }

        ticker.next().await;
        if shutdown_requested() {
            return;
        }
    }
}
