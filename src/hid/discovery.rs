//! Mouse field discovery.
//!
//! Runs once per attach. Walks the device's report items and records
//! where the buttons and the relative X/Y axes live, so that every later
//! report can be decoded without looking at the descriptor again.

use super::descriptor::ReportLayout;
use super::items::{DataModes, DeviceReportInfo, ReportItem, UsagePage};
use crate::config::{MAX_REPORT_SIZE, MIN_POLL_INTERVAL_MS};
use crate::error::{DiscoveryError, Error};

/// Location of one usage inside an input report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportFieldDescriptor {
    pub report_id: u8,
    /// First bit of the first value, relative to the report payload.
    pub bit_offset: u16,
    /// Bits per value.
    pub bit_length: u8,
    /// Number of consecutive values.
    pub field_count: u8,
    /// Byte length of the containing report.
    pub report_byte_length: u16,
    /// Interface the HID function lives on.
    pub interface: u8,
}

/// Everything needed to request and decode mouse reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseLayout {
    pub buttons: ReportFieldDescriptor,
    pub axes: ReportFieldDescriptor,
    /// Report ID to request (0 when the device uses a single report).
    pub report_id: u8,
    /// ID byte the device sends ahead of the payload when its reports are
    /// numbered.
    pub report_prefix: Option<u8>,
    /// Payload length of the mouse report, without the ID byte.
    pub report_byte_length: u16,
    /// Polling interval, never below [`MIN_POLL_INTERVAL_MS`].
    pub poll_interval_ms: u8,
}

impl MouseLayout {
    /// Parse a raw report descriptor and run discovery on it.
    pub fn from_descriptor(
        descriptor: &[u8],
        poll_rate_ms: u8,
        interface: u8,
    ) -> Result<Self, Error> {
        let parsed = ReportLayout::parse(descriptor, poll_rate_ms)?;
        Ok(discover(&parsed.info(interface))?)
    }

    pub fn poll_interval_ms(&self) -> u8 {
        self.poll_interval_ms
    }

    /// Bytes in one interrupt-IN transfer, ID byte included.
    pub fn transfer_length(&self) -> usize {
        usize::from(self.report_byte_length) + usize::from(self.report_prefix.is_some())
    }
}

/// X/Y: Input, Variable, Relative data on the Generic Desktop page.
fn is_axis_item(item: &ReportItem) -> bool {
    item.is_variable_input()
        && item.data_modes.contains(DataModes::RELATIVE)
        && item.usage_page == UsagePage::GenericDesktop
}

/// Buttons: Input, Variable data on the Button page.
fn is_button_item(item: &ReportItem) -> bool {
    item.is_variable_input() && item.usage_page == UsagePage::Button
}

fn describe(
    item: &ReportItem,
    info: &DeviceReportInfo<'_>,
) -> Result<ReportFieldDescriptor, DiscoveryError> {
    let report = info
        .report(item.report_index)
        .ok_or(DiscoveryError::UnknownReport(item.report_index))?;

    Ok(ReportFieldDescriptor {
        report_id: item.report_id,
        bit_offset: item.start_bit,
        bit_length: item.report_size,
        field_count: item.report_count,
        report_byte_length: report.input_bytes(),
        interface: info.interface,
    })
}

/// Locate the button and X/Y fields of an attached device.
///
/// The first matching item of each kind wins, so a wheel declared as a
/// separate item after X/Y does not displace the axes.
pub fn discover(info: &DeviceReportInfo<'_>) -> Result<MouseLayout, DiscoveryError> {
    let mut buttons: Option<(ReportFieldDescriptor, u8)> = None;
    let mut axes: Option<(ReportFieldDescriptor, u8)> = None;

    for item in info.items {
        if axes.is_none() && is_axis_item(item) {
            axes = Some((describe(item, info)?, item.report_index));
        } else if buttons.is_none() && is_button_item(item) {
            buttons = Some((describe(item, info)?, item.report_index));
        }
    }

    let (axes, axes_report) = axes.ok_or(DiscoveryError::AxisFieldMissing)?;
    let (buttons, buttons_report) = buttons.ok_or(DiscoveryError::ButtonFieldMissing)?;

    if buttons_report != axes_report {
        return Err(DiscoveryError::SplitReports);
    }

    let report = info
        .report(axes_report)
        .ok_or(DiscoveryError::UnknownReport(axes_report))?;
    // A device with a single report is addressed as report 0. Numbered
    // reports still arrive with their ID byte in front.
    let report_id = if info.reports.len() == 1 {
        0
    } else {
        report.report_id
    };
    let report_prefix = (report.report_id != 0).then_some(report.report_id);

    let report_byte_length = report.input_bytes();
    let transfer_length = report_byte_length + u16::from(report_prefix.is_some());
    if usize::from(transfer_length) > MAX_REPORT_SIZE {
        return Err(DiscoveryError::ReportTooLarge(transfer_length));
    }

    debug!(
        "discovered axes @{}+{}x{} buttons @{}+{}x{} in {} bytes",
        axes.bit_offset,
        axes.bit_length,
        axes.field_count,
        buttons.bit_offset,
        buttons.bit_length,
        buttons.field_count,
        report_byte_length
    );

    Ok(MouseLayout {
        buttons,
        axes,
        report_id,
        report_prefix,
        report_byte_length,
        poll_interval_ms: report.poll_rate_ms.max(MIN_POLL_INTERVAL_MS),
    })
}
