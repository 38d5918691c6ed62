//! Scroll animation tasks
//!
//! One task per scroller steps its offset and sleeps for the delay the
//! scheduler returns. Idle scrollers poll at the configured idle interval.

use defmt::*;
use embassy_time::Timer;

use flipdot_core::scroll::ScrollStep;
use flipdot_core::SourceId;

use crate::channels::shutdown_requested;
use crate::context::AppContext;

/// Most scrollers the firmware can animate
pub const SCROLLER_POOL_SIZE: usize = 16;

#[embassy_executor::task(pool_size = SCROLLER_POOL_SIZE)]
pub async fn scroller_task(ctx: &'static AppContext, scroller: SourceId) {
    info!("Scroller task started for source {}", scroller.index());

    let animation = ctx.config.animation;
    loop {
        let step = ctx.graph.with(|graph| graph.advance_scroller(scroller));
        if step == ScrollStep::Settled {
            debug!("Scroller {} settled", scroller.index());
        }

        Timer::after_millis(step.delay_ms(&animation) as u64).await;
        if shutdown_requested() {
            return;
        }
    }
}
