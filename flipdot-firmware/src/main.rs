//! Flipdot - Flip-dot display wall controller
//!
//! Firmware for an RP2040 driving a row of flip-dot modules over one shared
//! serial line. Clocks, counters, labels and menus are composed into a
//! single picture; five buttons navigate between them.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use heapless::Vec;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use flipdot_core::{SharedGraph, SourceGraph, SourceId};

use crate::config::load_config;
use crate::context::AppContext;
use crate::tasks::SCROLLER_POOL_SIZE;

/// Embedded wall configuration (compiled into firmware)
/// Edit flipdot.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../flipdot.toml");

/// Driver boards listen at 115200 baud 8N1
const DRIVER_BAUDRATE: u32 = 115200;

mod button;
mod channels;
mod config;
mod context;
mod tasks;
mod tree;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 16]> = StaticCell::new();

static CONTEXT: StaticCell<AppContext> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Flipdot controller starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config(EMBEDDED_CONFIG);

    let mut graph = SourceGraph::with_animation(config.animation);
    let tree = match tree::build(&mut graph, &config.geometry) {
        Ok(tree) => tree,
        Err(e) => {
            error!("Failed to build source tree: {:?}", e);
            return;
        }
    };
    let scrollers: Vec<SourceId, SCROLLER_POOL_SIZE> =
        graph.scrollers().take(SCROLLER_POOL_SIZE).collect();
    if graph.scrollers().count() > scrollers.len() {
        warn!("More scrollers than animation tasks, some will not move");
    }
    info!("Source tree built: {} sources, {} scrollers", graph.len(), scrollers.len());

    let ctx: &'static AppContext = CONTEXT.init(AppContext {
        graph: SharedGraph::new(graph),
        tree,
        config,
    });

    // The driver boards never answer; RX is wired but unused
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = DRIVER_BAUDRATE;
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 16]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, _rx) = uart.split();
    info!("UART initialized for driver boards");

    let buttons = tasks::Buttons {
        up: Input::new(p.PIN_2, Pull::Up),
        down: Input::new(p.PIN_3, Pull::Up),
        left: Input::new(p.PIN_4, Pull::Up),
        right: Input::new(p.PIN_5, Pull::Up),
        center: Input::new(p.PIN_6, Pull::Up),
    };
    info!("Buttons initialized");

    spawner.spawn(tasks::render_task(ctx, tx)).unwrap();
    for scroller in scrollers {
        spawner.spawn(tasks::scroller_task(ctx, scroller)).unwrap();
    }
    spawner.spawn(tasks::input_task(buttons)).unwrap();
    spawner.spawn(tasks::navigation_task(ctx)).unwrap();
    spawner.spawn(tasks::clock_task(ctx)).unwrap();
    spawner.spawn(tasks::counter_task(ctx)).unwrap();
    spawner.spawn(tasks::countdown_task(ctx)).unwrap();

    info!("All tasks spawned, controller running");

    while !channels::shutdown_requested() {
        embassy_time::Timer::after_secs(1).await;
    }
    info!("Shutdown requested");
}
