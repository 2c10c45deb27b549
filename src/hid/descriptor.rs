//! HID Report Descriptor parser.
//!
//! Turns raw report descriptor bytes into the flat item/report model of
//! [`super::items`], for host stacks that hand over the descriptor but do
//! not expose a parsed item list of their own.
//!
//! ## HID Report Descriptor Structure
//!
//! A Report Descriptor is a sequence of items that describe the
//! format of HID reports. Key items:
//! - Usage Page: Category of usages (generic desktop, button, ...)
//! - Report ID: Identifies which report follows (if multiple)
//! - Report Size: Bits per field
//! - Report Count: Number of fields
//! - Input/Output/Feature: Direction of the report
//!
//! ## Limitations
//!
//! This implementation handles common cases but not the full HID spec:
//! - Nested collections are flattened
//! - Push/Pop state is not supported
//! - Delimiter tags and local usages are ignored
//! - Long items are skipped

use heapless::Vec;

use super::items::{DataModes, DeviceReportInfo, ReportInfo, ReportItem, ReportType, UsagePage};
use crate::config::{MAX_REPORTS, MAX_REPORT_ITEMS};
use crate::error::DescriptorError;

const LONG_ITEM_PREFIX: u8 = 0xFE;

// Item types (bits 2..3 of the prefix).
const TYPE_MAIN: u8 = 0;
const TYPE_GLOBAL: u8 = 1;

// Main item tags.
const TAG_INPUT: u8 = 0x08;
const TAG_OUTPUT: u8 = 0x09;
const TAG_FEATURE: u8 = 0x0B;

// Global item tags.
const TAG_USAGE_PAGE: u8 = 0x00;
const TAG_REPORT_SIZE: u8 = 0x07;
const TAG_REPORT_ID: u8 = 0x08;
const TAG_REPORT_COUNT: u8 = 0x09;

/// Parsed report layout, owning its item and report lists.
#[derive(Clone, Debug, Default)]
pub struct ReportLayout {
    items: Vec<ReportItem, MAX_REPORT_ITEMS>,
    reports: Vec<ReportInfo, MAX_REPORTS>,
}

/// Global item state carried between main items.
struct Globals {
    usage_page: UsagePage,
    report_id: u8,
    report_size: u32,
    report_count: u32,
}

impl ReportLayout {
    /// Parse a HID Report Descriptor.
    ///
    /// `poll_rate_ms` is the interrupt endpoint interval; it is recorded on
    /// every report since the descriptor itself does not carry it.
    pub fn parse(data: &[u8], poll_rate_ms: u8) -> Result<Self, DescriptorError> {
        let mut layout = ReportLayout::default();
        let mut globals = Globals {
            usage_page: UsagePage::Unknown(0),
            report_id: 0,
            report_size: 0,
            report_count: 0,
        };

        let mut i = 0;
        while i < data.len() {
            let prefix = data[i];

            if prefix == LONG_ITEM_PREFIX {
                // bDataSize, bLongItemTag, data...
                let size = *data
                    .get(i + 1)
                    .ok_or(DescriptorError::Truncated { offset: i })?
                    as usize;
                if i + 3 + size > data.len() {
                    return Err(DescriptorError::Truncated { offset: i });
                }
                i += 3 + size;
                continue;
            }

            let tag = (prefix >> 4) & 0x0F;
            let item_type = (prefix >> 2) & 0x03;
            let size = match prefix & 0x03 {
                0 => 0,
                1 => 1,
                2 => 2,
                _ => 4,
            };

            if i + 1 + size > data.len() {
                return Err(DescriptorError::Truncated { offset: i });
            }

            let value: u32 = match size {
                0 => 0,
                1 => data[i + 1] as u32,
                2 => u16::from_le_bytes([data[i + 1], data[i + 2]]) as u32,
                _ => u32::from_le_bytes([data[i + 1], data[i + 2], data[i + 3], data[i + 4]]),
            };

            match item_type {
                TYPE_MAIN => {
                    let report_type = match tag {
                        TAG_INPUT => Some(ReportType::Input),
                        TAG_OUTPUT => Some(ReportType::Output),
                        TAG_FEATURE => Some(ReportType::Feature),
                        // Collection / End Collection: flattened.
                        _ => None,
                    };
                    if let Some(report_type) = report_type {
                        layout.push_item(report_type, value, &globals, poll_rate_ms)?;
                    }
                }
                TYPE_GLOBAL => match tag {
                    TAG_USAGE_PAGE => globals.usage_page = UsagePage::from(value as u16),
                    TAG_REPORT_ID => globals.report_id = value as u8,
                    TAG_REPORT_SIZE => globals.report_size = value,
                    TAG_REPORT_COUNT => globals.report_count = value,
                    _ => {}
                },
                // Local items only carry usages, which discovery does not need.
                _ => {}
            }

            i += 1 + size;
        }

        if layout.reports.iter().all(|r| r.input_bits == 0) {
            debug!("HID descriptor: no input report declared");
            return Err(DescriptorError::NoInputReport);
        }

        Ok(layout)
    }

    fn push_item(
        &mut self,
        report_type: ReportType,
        flags: u32,
        globals: &Globals,
        poll_rate_ms: u8,
    ) -> Result<(), DescriptorError> {
        let report_size =
            u8::try_from(globals.report_size).map_err(|_| DescriptorError::FieldTooWide)?;
        let report_count =
            u8::try_from(globals.report_count).map_err(|_| DescriptorError::FieldTooWide)?;

        let report_index = self.report_index_for(globals.report_id, poll_rate_ms)?;
        let report = &mut self.reports[report_index];

        let start_bit = if report_type == ReportType::Input {
            let start = report.input_bits;
            let total = u16::from(report_size) * u16::from(report_count);
            report.input_bits = start
                .checked_add(total)
                .ok_or(DescriptorError::FieldTooWide)?;
            start
        } else {
            0
        };

        self.items
            .push(ReportItem {
                report_type,
                data_modes: DataModes::from_bits_truncate(flags as u16),
                usage_page: globals.usage_page,
                report_id: globals.report_id,
                report_index: report_index as u8,
                start_bit,
                report_size,
                report_count,
            })
            .map_err(|_| DescriptorError::TooManyItems)
    }

    fn report_index_for(&mut self, report_id: u8, poll_rate_ms: u8) -> Result<usize, DescriptorError> {
        if let Some(index) = self.reports.iter().position(|r| r.report_id == report_id) {
            return Ok(index);
        }
        self.reports
            .push(ReportInfo {
                report_id,
                input_bits: 0,
                poll_rate_ms,
            })
            .map_err(|_| DescriptorError::TooManyReports)?;
        Ok(self.reports.len() - 1)
    }

    pub fn items(&self) -> &[ReportItem] {
        &self.items
    }

    pub fn reports(&self) -> &[ReportInfo] {
        &self.reports
    }

    /// Borrow the layout in the shape discovery consumes.
    pub fn info(&self, interface: u8) -> DeviceReportInfo<'_> {
        DeviceReportInfo {
            items: &self.items,
            reports: &self.reports,
            interface,
        }
    }
}
