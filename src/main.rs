//! mouse2spi firmware entry point (nRF52840).
//!
//! Runs the mouse poller on the vendor USB host stack and forwards each
//! cursor update over SPIM3.
//!
//! ```text
//!   USB mouse ──▶ host stack (C) ──▶ MousePoller ──▶ SPIM3 ──▶ consumer
//! ```

#![no_std]
#![no_main]

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_nrf::{bind_interrupts, peripherals, spim};
use embassy_time::{Duration, Ticker, Timer};
use embedded_hal::spi::{Mode, Phase, Polarity};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use mouse2spi::config::{PollerConfig, MAX_REPORT_SIZE, TICK_PERIOD_MS};
use mouse2spi::usb::vendor::VendorHidHost;
use mouse2spi::{LinkConfig, MousePoller, SpiLink, TickOutcome};

bind_interrupts!(struct Irqs {
    SPIM3 => spim::InterruptHandler<peripherals::SPI3>;
});

static REPORT_RX: StaticCell<[u8; MAX_REPORT_SIZE]> = StaticCell::new();

/// Highest SPIM clock not above `hz`.
fn spim_frequency(hz: u32) -> spim::Frequency {
    match hz {
        8_000_000.. => spim::Frequency::M8,
        4_000_000.. => spim::Frequency::M4,
        2_000_000.. => spim::Frequency::M2,
        1_000_000.. => spim::Frequency::M1,
        500_000.. => spim::Frequency::K500,
        250_000.. => spim::Frequency::K250,
        _ => spim::Frequency::K125,
    }
}

fn spim_mode(mode: Mode) -> spim::Mode {
    match (mode.polarity, mode.phase) {
        (Polarity::IdleLow, Phase::CaptureOnFirstTransition) => spim::MODE_0,
        (Polarity::IdleLow, Phase::CaptureOnSecondTransition) => spim::MODE_1,
        (Polarity::IdleHigh, Phase::CaptureOnFirstTransition) => spim::MODE_2,
        (Polarity::IdleHigh, Phase::CaptureOnSecondTransition) => spim::MODE_3,
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("mouse2spi starting");
    let p = embassy_nrf::init(Default::default());

    // The link must be configured before first use and never again.
    let link_config = LinkConfig::default();
    let mut spi_config = spim::Config::default();
    spi_config.frequency = spim_frequency(link_config.frequency_hz);
    spi_config.mode = spim_mode(link_config.mode);
    let spim = spim::Spim::new(p.SPI3, Irqs, p.P0_13, p.P0_14, p.P0_15, spi_config);
    let link = SpiLink::new(spim, link_config);

    let host = VendorHidHost::new(REPORT_RX.init([0; MAX_REPORT_SIZE]));
    let mut poller = MousePoller::new(host, link, PollerConfig::default());

    let mut ticker = Ticker::every(Duration::from_millis(TICK_PERIOD_MS));
    loop {
        match poller.tick() {
            TickOutcome::Attached => info!("mouse ready: {}", poller.layout()),
            TickOutcome::Rejected(e) => warn!("not a usable mouse: {}", e),
            TickOutcome::Detached => info!("mouse removed"),
            TickOutcome::Faulted => warn!("mouse faulted, replug to recover"),
            TickOutcome::LinkFailed { position } => warn!("SPI send failed at {}", position),
            outcome @ (TickOutcome::Forwarded { .. } | TickOutcome::TransferFailed { .. }) => {
                defmt::trace!("{}", outcome);
                // Next read no sooner than the device's poll interval.
                if let Some(layout) = poller.layout() {
                    Timer::after(Duration::from_millis(u64::from(layout.poll_interval_ms())))
                        .await;
                    ticker.reset();
                    continue;
                }
            }
            _ => {}
        }
        ticker.next().await;
    }
}
