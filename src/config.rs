//! Application-wide constants and runtime configuration.
//!
//! Compile-time limits live here so they can be tuned in one place.
//! Values that a caller may want to vary per build (viewport, error
//! threshold, CCID capability set) are carried by plain config structs
//! resolved when the owning component is constructed.

use crate::motion::Viewport;

// Cursor

/// Width of the absolute cursor space (inclusive upper bound for X).
pub const VIEWPORT_WIDTH: i16 = 640;

/// Height of the absolute cursor space (inclusive upper bound for Y).
pub const VIEWPORT_HEIGHT: i16 = 480;

// Polling

/// Consecutive failed transfers before the poller gives up on a device.
pub const MAX_ERROR_COUNTER: u8 = 10;

/// Minimum HID report polling interval (ms).
pub const MIN_POLL_INTERVAL_MS: u8 = 10;

/// Period of one state-machine tick in the embedded main loop (ms).
pub const TICK_PERIOD_MS: u64 = 1;

// Report buffers

/// Largest input report we accept (full-speed interrupt max packet).
pub const MAX_REPORT_SIZE: usize = 64;

/// Largest report count decoded from a single field.
pub const MAX_FIELD_VALUES: usize = 16;

/// Report items kept by the descriptor parser.
pub const MAX_REPORT_ITEMS: usize = 32;

/// Distinct report IDs kept by the descriptor parser.
pub const MAX_REPORTS: usize = 8;

/// Largest raw report descriptor read from the host stack.
pub const MAX_DESCRIPTOR_SIZE: usize = 256;

// SPI link to the position consumer
//
// Wiring on the nRF52840-DK (SPIM3):
//
//   SCK   → P0.13
//   MISO  → P0.14
//   MOSI  → P0.15

/// SPI clock rate (Hz).
pub const LINK_FREQUENCY_HZ: u32 = 1_250_000;

/// SPI mode: data sampled on the rising SCK edge, clock idles low.
pub const LINK_MODE: embedded_hal::spi::Mode = embedded_hal::spi::MODE_0;

// CCID

/// Interface number claimed by the CCID function.
pub const CCID_INTERFACE_ID: u8 = 0;

/// Runtime configuration for [`crate::poller::MousePoller`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollerConfig {
    /// Bounds the integrated cursor is clamped to.
    pub viewport: Viewport,
    /// Consecutive failed transfers that fault the device.
    pub max_errors: u8,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::DEFAULT,
            max_errors: MAX_ERROR_COUNTER,
        }
    }
}

/// CCID class requests this build answers. Anything not enabled here is
/// reported as unsupported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CcidCapabilities {
    pub abort: bool,
    pub clock_frequencies: bool,
    pub data_rates: bool,
}

impl Default for CcidCapabilities {
    /// Only ABORT: fixed clock and data rate.
    fn default() -> Self {
        Self {
            abort: true,
            clock_frequencies: false,
            data_rates: false,
        }
    }
}
