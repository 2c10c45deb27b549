//! Parsed report descriptor model.
//!
//! This is the shape a host stack's descriptor parser hands to discovery:
//! a flat list of main items (one per Input/Output/Feature item) plus the
//! list of reports those items belong to.

use bitflags::bitflags;

/// Direction of a main item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportType {
    Input,
    Output,
    Feature,
}

bitflags! {
    /// Data bits of an Input/Output/Feature main item (HID 1.11, 6.2.2.5).
    ///
    /// A cleared bit means the first alternative: Data, Array, Absolute, ...
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DataModes: u16 {
        const CONSTANT       = 1 << 0;
        const VARIABLE       = 1 << 1;
        const RELATIVE       = 1 << 2;
        const WRAP           = 1 << 3;
        const NON_LINEAR     = 1 << 4;
        const NO_PREFERRED   = 1 << 5;
        const NULL_STATE     = 1 << 6;
        const VOLATILE       = 1 << 7;
        const BUFFERED_BYTES = 1 << 8;
    }
}

/// Usage page codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsagePage {
    /// Generic Desktop (pointer axes, wheel).
    GenericDesktop,
    /// Keyboard/Keypad.
    Keyboard,
    /// LEDs.
    Led,
    /// Button.
    Button,
    /// Consumer Control.
    Consumer,
    /// Unknown/unsupported.
    Unknown(u16),
}

impl From<u16> for UsagePage {
    fn from(code: u16) -> Self {
        match code {
            0x01 => UsagePage::GenericDesktop,
            0x07 => UsagePage::Keyboard,
            0x08 => UsagePage::Led,
            0x09 => UsagePage::Button,
            0x0C => UsagePage::Consumer,
            other => UsagePage::Unknown(other),
        }
    }
}

/// One main item from the report descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportItem {
    pub report_type: ReportType,
    pub data_modes: DataModes,
    pub usage_page: UsagePage,
    /// Report ID in force when the item was declared (0 = no IDs).
    pub report_id: u8,
    /// Index into [`DeviceReportInfo::reports`].
    pub report_index: u8,
    /// Bit position of the first field inside the report payload.
    pub start_bit: u16,
    /// Report Size: bits per field.
    pub report_size: u8,
    /// Report Count: number of fields.
    pub report_count: u8,
}

impl ReportItem {
    pub fn is_input(&self) -> bool {
        self.report_type == ReportType::Input
    }

    /// Input, Variable, not Constant.
    pub fn is_variable_input(&self) -> bool {
        self.is_input()
            && self.data_modes.contains(DataModes::VARIABLE)
            && !self.data_modes.contains(DataModes::CONSTANT)
    }
}

/// One report declared by the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportInfo {
    pub report_id: u8,
    /// Total bits of all Input items in this report (excluding the ID byte).
    pub input_bits: u16,
    /// Interrupt endpoint polling interval (ms).
    pub poll_rate_ms: u8,
}

impl ReportInfo {
    /// Input payload length in bytes, rounded up.
    pub fn input_bytes(&self) -> u16 {
        self.input_bits.div_ceil(8)
    }
}

/// Borrowed view of a device's parsed report layout.
#[derive(Clone, Copy, Debug)]
pub struct DeviceReportInfo<'a> {
    pub items: &'a [ReportItem],
    pub reports: &'a [ReportInfo],
    /// Interface number the HID function was found on.
    pub interface: u8,
}

impl<'a> DeviceReportInfo<'a> {
    pub fn report(&self, index: u8) -> Option<&'a ReportInfo> {
        self.reports.get(usize::from(index))
    }
}
