//! Mouse polling state machine.
//!
//! One [`MousePoller::tick`] per loop iteration. A tick services the host
//! stack, checks presence, then runs the current state's action:
//!
//! ```text
//! NotConnected ──attach+discovery──▶ Connected ──▶ ReadyForTransfer
//!                                                     │        ▲
//!                                                     ▼        │
//!                              AwaitingReport ──▶ ReportPending
//!                                                     │
//!                                     too many errors ▼
//!                                                  Faulted
//! ```
//!
//! Absence always wins: whatever the state, a tick that finds no device
//! goes to `NotConnected` and forgets the layout.

use crate::config::{PollerConfig, MAX_REPORT_SIZE};
use crate::error::DiscoveryError;
use crate::forward::{forward_position, WordLink};
use crate::hid::{decode_sample, discover, MouseLayout, MouseSample};
use crate::motion::CursorPosition;
use crate::usb::{HidHost, RequestStatus, TransferStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    NotConnected,
    Connected,
    ReadyForTransfer,
    AwaitingReport,
    ReportPending,
    /// Too many consecutive transfer errors. Left only by detaching.
    Faulted,
}

/// Consecutive failed transfers since the last success.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ErrorCounter {
    count: u8,
}

impl ErrorCounter {
    /// Count one failure and return the new total.
    pub fn record_failure(&mut self) -> u8 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u8 {
        self.count
    }
}

/// Destination of each interrupt-IN read.
#[derive(Clone, Debug)]
pub struct RawReportBuffer {
    report_id: u8,
    len: usize,
    bytes: [u8; MAX_REPORT_SIZE],
}

impl RawReportBuffer {
    pub const fn new() -> Self {
        Self {
            report_id: 0,
            len: 0,
            bytes: [0; MAX_REPORT_SIZE],
        }
    }

    /// Size the buffer for a new device's report.
    pub fn prepare(&mut self, report_id: u8, len: usize) {
        self.report_id = report_id;
        self.len = len.min(MAX_REPORT_SIZE);
        self.bytes = [0; MAX_REPORT_SIZE];
    }

    pub fn report_id(&self) -> u8 {
        self.report_id
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The expected transfer bytes, ID byte included.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Leading ID byte of a numbered report.
    pub fn leading_id(&self) -> Option<u8> {
        self.as_slice().first().copied()
    }

    fn storage_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..self.len]
    }
}

impl Default for RawReportBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// No device, nothing to do.
    Absent,
    /// Device still present but was rejected earlier.
    Ignored,
    /// The device went away.
    Detached,
    /// A new device passed discovery.
    Attached,
    /// A new device failed discovery.
    Rejected(DiscoveryError),
    /// Moved to the next state without I/O.
    Advanced,
    /// A report read was queued.
    Requested,
    /// The stack could not queue the read; retried next tick.
    Busy,
    /// The queued read has not finished.
    Pending,
    /// A numbered report other than the mouse's arrived and was dropped.
    Skipped { report_id: u8 },
    /// The read failed; `consecutive` failures so far.
    TransferFailed { consecutive: u8 },
    /// The read failed and the error limit was reached.
    Faulted,
    /// Nothing happens in `Faulted`.
    Halted,
    /// A report was decoded and the new position sent.
    Forwarded {
        sample: MouseSample,
        position: CursorPosition,
    },
    /// A report was decoded but sending the position failed.
    LinkFailed { position: CursorPosition },
}

/// Owns everything the polling loop mutates.
pub struct MousePoller<H, L> {
    host: H,
    link: L,
    config: PollerConfig,
    state: DeviceState,
    layout: Option<MouseLayout>,
    /// Discovery failed for the device currently attached.
    rejected: bool,
    errors: ErrorCounter,
    raw: RawReportBuffer,
    cursor: CursorPosition,
}

impl<H: HidHost, L: WordLink> MousePoller<H, L> {
    pub fn new(host: H, link: L, config: PollerConfig) -> Self {
        Self {
            host,
            link,
            config,
            state: DeviceState::NotConnected,
            layout: None,
            rejected: false,
            errors: ErrorCounter::default(),
            raw: RawReportBuffer::new(),
            cursor: CursorPosition::ORIGIN,
        }
    }

    /// Run one iteration of the state machine.
    pub fn tick(&mut self) -> TickOutcome {
        self.host.service();

        if !self.host.device_present() {
            return self.on_absent();
        }

        match self.state {
            DeviceState::NotConnected => self.attach(),
            DeviceState::Connected => {
                self.state = DeviceState::ReadyForTransfer;
                TickOutcome::Advanced
            }
            DeviceState::ReadyForTransfer => {
                self.state = DeviceState::AwaitingReport;
                TickOutcome::Advanced
            }
            DeviceState::AwaitingReport => self.request(),
            DeviceState::ReportPending => self.complete(),
            DeviceState::Faulted => TickOutcome::Halted,
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    pub fn error_count(&self) -> u8 {
        self.errors.count()
    }

    pub fn layout(&self) -> Option<&MouseLayout> {
        self.layout.as_ref()
    }

    pub fn raw_report(&self) -> &RawReportBuffer {
        &self.raw
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn into_parts(self) -> (H, L) {
        (self.host, self.link)
    }

    fn on_absent(&mut self) -> TickOutcome {
        self.rejected = false;
        self.layout = None;
        if self.state == DeviceState::NotConnected {
            return TickOutcome::Absent;
        }
        info!("device detached");
        self.state = DeviceState::NotConnected;
        TickOutcome::Detached
    }

    fn attach(&mut self) -> TickOutcome {
        if self.rejected {
            return TickOutcome::Ignored;
        }

        let discovered = match self.host.report_info() {
            Some(info) => discover(&info),
            None => Err(DiscoveryError::NoReportInfo),
        };

        match discovered {
            Ok(layout) => {
                info!(
                    "mouse attached: report {} ({} bytes), poll {} ms",
                    layout.report_id,
                    layout.transfer_length(),
                    layout.poll_interval_ms
                );
                self.raw.prepare(layout.report_id, layout.transfer_length());
                self.layout = Some(layout);
                self.errors.reset();
                self.state = DeviceState::Connected;
                TickOutcome::Attached
            }
            Err(e) => {
                warn!("device rejected: {}", e);
                self.rejected = true;
                TickOutcome::Rejected(e)
            }
        }
    }

    fn request(&mut self) -> TickOutcome {
        let Some(layout) = self.layout else {
            self.state = DeviceState::NotConnected;
            return TickOutcome::Detached;
        };

        match self
            .host
            .request_report(layout.report_id, layout.transfer_length())
        {
            RequestStatus::Accepted => {
                self.state = DeviceState::ReportPending;
                TickOutcome::Requested
            }
            RequestStatus::Busy => TickOutcome::Busy,
        }
    }

    fn complete(&mut self) -> TickOutcome {
        let Some(layout) = self.layout else {
            self.state = DeviceState::NotConnected;
            return TickOutcome::Detached;
        };

        let result = match self.host.poll_transfer(self.raw.storage_mut()) {
            TransferStatus::Pending => return TickOutcome::Pending,
            TransferStatus::Complete(result) => result,
        };

        // Composite devices share the pipe; other reports are not errors.
        if let Some(expected) = layout.report_prefix {
            let foreign = self.raw.leading_id().filter(|&id| id != expected);
            if let Some(id) = foreign.filter(|_| result.is_ok() && result.bytes_received > 0) {
                debug!("skipping report {}", id);
                self.state = DeviceState::ReadyForTransfer;
                return TickOutcome::Skipped { report_id: id };
            }
        }

        if !result.is_ok() || result.bytes_received != self.raw.len() {
            debug!(
                "transfer failed: code {}, {} of {} bytes",
                result.error_code,
                result.bytes_received,
                self.raw.len()
            );
            return self.fail_transfer();
        }

        let payload = &self.raw.as_slice()[usize::from(layout.report_prefix.is_some())..];
        let sample = match decode_sample(payload, &layout) {
            Ok(sample) => sample,
            Err(e) => {
                debug!("report decode failed: {}", e);
                return self.fail_transfer();
            }
        };

        self.errors.reset();
        self.state = DeviceState::ReadyForTransfer;

        let position = self
            .config
            .viewport
            .integrate(self.cursor, sample.dx, sample.dy);
        self.cursor = position;

        match forward_position(&mut self.link, position) {
            Ok(_) => TickOutcome::Forwarded { sample, position },
            Err(_) => {
                warn!("position link exchange failed");
                TickOutcome::LinkFailed { position }
            }
        }
    }

    fn fail_transfer(&mut self) -> TickOutcome {
        let consecutive = self.errors.record_failure();
        if consecutive >= self.config.max_errors {
            error!("{} consecutive transfer errors, device faulted", consecutive);
            self.state = DeviceState::Faulted;
            return TickOutcome::Faulted;
        }
        self.state = DeviceState::ReadyForTransfer;
        TickOutcome::TransferFailed { consecutive }
    }
}
