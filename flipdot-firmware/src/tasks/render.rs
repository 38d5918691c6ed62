//! Render task
//!
//! Composes the wall once per frame interval and streams the changed
//! columns to the driver boards. Composition runs inside the graph lock;
//! the UART write happens after it is released.

use defmt::*;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Duration, Ticker};
use embedded_io_async::Write;

use flipdot_core::render::FrameRenderer;
use flipdot_protocol::CommandBuffer;

use crate::channels::shutdown_requested;
use crate::context::AppContext;

/// Room for a full redraw of eight modules plus their start-up settings
const COMMAND_BUFFER_SIZE: usize = 128;

#[embassy_executor::task]
pub async fn render_task(ctx: &'static AppContext, mut tx: BufferedUartTx<'static, UART0>) {
    info!("Render task started");

    let mut renderer = FrameRenderer::new(ctx.config.geometry, &ctx.config.render);
    let mut out = CommandBuffer::<COMMAND_BUFFER_SIZE>::new();

    match renderer.configure_modules(&mut out) {
        Ok(()) => send(&mut tx, out.as_bytes()).await,
        Err(e) => warn!("Failed to encode module settings: {:?}", e),
    }

    let interval = Duration::from_millis(ctx.config.render.frame_interval_ms as u64);
    let mut ticker = Ticker::every(interval);

    loop {
        ticker.next().await;
        out.clear();

        if shutdown_requested() {
            match renderer.blank(&mut out) {
                Ok(_) => send(&mut tx, out.as_bytes()).await,
                Err(e) => warn!("Failed to encode blank frame: {:?}", e),
            }
            info!("Render task stopped, wall blanked");
            return;
        }

        let result = ctx
            .graph
            .with(|graph| renderer.render(graph, ctx.tree.root, &mut out));
        match result {
            Ok(stats) if stats.bytes > 0 => {
                trace!(
                    "Frame: full={} modules={} columns={} bytes={}",
                    stats.full_redraw,
                    stats.modules_written,
                    stats.columns_written,
                    stats.bytes
                );
                send(&mut tx, out.as_bytes()).await;
            }
            Ok(_) => {}
            // The renderer falls back to a full redraw on the next pass
            Err(e) => warn!("Frame encode failed: {:?}", e),
        }
    }
}

async fn send(tx: &mut BufferedUartTx<'static, UART0>, bytes: &[u8]) {
    if let Err(e) = tx.write_all(bytes).await {
        warn!("Failed to write to driver boards: {:?}", e);
    }
}
