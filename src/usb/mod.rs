//! USB host boundary.
//!
//! The poller never talks to a USB controller directly. It drives a
//! [`HidHost`], which wraps whatever host stack enumerates the mouse and
//! moves interrupt-IN data. On target that is the C stack behind
//! [`vendor`]; in tests it is a scripted fake.

use crate::hid::DeviceReportInfo;

#[cfg(feature = "embedded")]
pub mod vendor;

/// Answer to a report request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestStatus {
    /// The transfer is queued.
    Accepted,
    /// The stack cannot take a request right now; try again next tick.
    Busy,
}

/// Outcome of a finished transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferResult {
    /// Stack error code, 0 on success.
    pub error_code: u8,
    pub bytes_received: usize,
}

impl TransferResult {
    pub fn is_ok(&self) -> bool {
        self.error_code == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferStatus {
    Pending,
    Complete(TransferResult),
}

/// Host-side HID driver the poller runs on top of.
pub trait HidHost {
    /// Give the stack a chance to run its own housekeeping.
    fn service(&mut self);

    /// Whether an enumerated HID device is attached.
    fn device_present(&mut self) -> bool;

    /// Parsed report layout of the attached device.
    fn report_info(&mut self) -> Option<DeviceReportInfo<'_>>;

    /// Queue an interrupt-IN read of `len` bytes of report `report_id`.
    fn request_report(&mut self, report_id: u8, len: usize) -> RequestStatus;

    /// Check the queued read. On completion the payload is in `dest`.
    fn poll_transfer(&mut self, dest: &mut [u8]) -> TransferStatus;
}
