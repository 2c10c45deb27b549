//! [`HidHost`] over the vendor C USB host stack.
//!
//! The stack is linked in as `libhidhost.a` (see `build.rs`) and exposes
//! a small polling API. It owns enumeration and the interrupt pipe; we
//! only read the raw report descriptor once per attach and parse it
//! ourselves.

use super::{HidHost, RequestStatus, TransferResult, TransferStatus};
use crate::config::{MAX_DESCRIPTOR_SIZE, MAX_REPORT_SIZE};
use crate::hid::{DeviceReportInfo, ReportLayout};

mod raw {
    extern "C" {
        /// Run the stack's state machine. Call once per tick.
        pub fn hidhost_tasks();
        /// True while an enumerated HID device is attached.
        pub fn hidhost_device_detect() -> bool;
        /// Raw report descriptor of the attached device; length in `len`.
        pub fn hidhost_report_descriptor(len: *mut u16) -> *const u8;
        /// bInterval of the interrupt-IN endpoint (ms).
        pub fn hidhost_poll_rate_ms() -> u8;
        pub fn hidhost_interface_num() -> u8;
        /// Queue a read into `buf`. Returns 0 when the read was queued.
        pub fn hidhost_get_report(report_id: u8, offset: u16, len: u16, buf: *mut u8) -> u8;
        /// True once the queued read finished; fills `err` and `bytes`.
        pub fn hidhost_transfer_is_complete(err: *mut u8, bytes: *mut u16) -> bool;
    }
}

pub struct VendorHidHost {
    /// DMA target handed to the stack. Stays put for the life of the host.
    rx: &'static mut [u8; MAX_REPORT_SIZE],
    layout: Option<ReportLayout>,
    interface: u8,
    /// Parse already failed for the current attach.
    parse_failed: bool,
}

impl VendorHidHost {
    pub fn new(rx: &'static mut [u8; MAX_REPORT_SIZE]) -> Self {
        Self {
            rx,
            layout: None,
            interface: 0,
            parse_failed: false,
        }
    }

    fn load_layout(&mut self) {
        let mut len: u16 = 0;
        // SAFETY: the stack returns a pointer into its own descriptor
        // buffer, valid until the device detaches, and sets `len`.
        let descriptor = unsafe {
            let ptr = raw::hidhost_report_descriptor(&mut len);
            if ptr.is_null() {
                warn!("host stack returned no report descriptor");
                self.parse_failed = true;
                return;
            }
            core::slice::from_raw_parts(ptr, usize::from(len).min(MAX_DESCRIPTOR_SIZE))
        };

        // SAFETY: plain getters with no preconditions.
        let (poll_rate, interface) =
            unsafe { (raw::hidhost_poll_rate_ms(), raw::hidhost_interface_num()) };

        match ReportLayout::parse(descriptor, poll_rate) {
            Ok(layout) => {
                debug!(
                    "descriptor: {} bytes, {} items, {} reports",
                    len,
                    layout.items().len(),
                    layout.reports().len()
                );
                self.layout = Some(layout);
                self.interface = interface;
            }
            Err(e) => {
                warn!("report descriptor rejected: {}", e);
                self.parse_failed = true;
            }
        }
    }
}

impl HidHost for VendorHidHost {
    fn service(&mut self) {
        // SAFETY: single-threaded; only ever called from the poll loop.
        unsafe { raw::hidhost_tasks() }
    }

    fn device_present(&mut self) -> bool {
        // SAFETY: plain getter.
        let present = unsafe { raw::hidhost_device_detect() };
        if !present {
            self.layout = None;
            self.parse_failed = false;
        }
        present
    }

    fn report_info(&mut self) -> Option<DeviceReportInfo<'_>> {
        if self.layout.is_none() && !self.parse_failed {
            self.load_layout();
        }
        let interface = self.interface;
        self.layout.as_ref().map(|l| l.info(interface))
    }

    fn request_report(&mut self, report_id: u8, len: usize) -> RequestStatus {
        let len = len.min(MAX_REPORT_SIZE) as u16;
        // SAFETY: `rx` is 'static and at least `len` bytes long.
        let status = unsafe { raw::hidhost_get_report(report_id, 0, len, self.rx.as_mut_ptr()) };
        if status == 0 {
            RequestStatus::Accepted
        } else {
            RequestStatus::Busy
        }
    }

    fn poll_transfer(&mut self, dest: &mut [u8]) -> TransferStatus {
        let mut err: u8 = 0;
        let mut bytes: u16 = 0;
        // SAFETY: both out-params are valid locals.
        let done = unsafe { raw::hidhost_transfer_is_complete(&mut err, &mut bytes) };
        if !done {
            return TransferStatus::Pending;
        }

        let received = usize::from(bytes).min(MAX_REPORT_SIZE);
        let n = received.min(dest.len());
        dest[..n].copy_from_slice(&self.rx[..n]);
        TransferStatus::Complete(TransferResult {
            error_code: err,
            bytes_received: received,
        })
    }
}
