//! mouse2spi: USB HID mouse to SPI cursor bridge.
//!
//! Polls a USB mouse through a host stack, decodes its reports, keeps an
//! absolute cursor clamped to 640x480 and pushes every update to a
//! consumer over SPI.
//!
//! Everything below is `no_std` and hardware-free, so it runs under
//! `cargo test` on the host. The nRF52840 binary in `main.rs` wires it to
//! real peripherals (feature `embedded`).

#![cfg_attr(not(test), no_std)]

// Must come first so the other modules see its macros.
mod fmt;

// ═══════════════════════════════════════════════════════════════════════════
// Configuration & errors
// ═══════════════════════════════════════════════════════════════════════════

pub mod config;
pub mod error;

// ═══════════════════════════════════════════════════════════════════════════
// Mouse pipeline: host -> poller -> decode -> motion -> forward
// ═══════════════════════════════════════════════════════════════════════════

pub mod forward;
pub mod hid;
pub mod motion;
pub mod poller;
pub mod usb;

// ═══════════════════════════════════════════════════════════════════════════
// Smart-card reader surface
// ═══════════════════════════════════════════════════════════════════════════

pub mod ccid;
pub mod smartcard;

pub use config::PollerConfig;
pub use error::Error;
pub use forward::{LinkConfig, SpiLink, WordLink};
pub use motion::{CursorPosition, Viewport};
pub use poller::{DeviceState, MousePoller, TickOutcome};
pub use usb::HidHost;
