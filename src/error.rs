//! Unified error types for mouse2spi.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The raw report descriptor could not be parsed.
    Descriptor(DescriptorError),

    /// The attached device does not look like a usable mouse.
    Discovery(DiscoveryError),

    /// A report did not match the discovered layout.
    Decode(DecodeError),

    /// The SPI link to the position consumer failed.
    Link(LinkError),
}

/// Report descriptor parsing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DescriptorError {
    /// An item claims more data bytes than the descriptor holds.
    Truncated {
        /// Byte offset of the offending item prefix.
        offset: usize,
    },
    /// More main items than `MAX_REPORT_ITEMS`.
    TooManyItems,
    /// More report IDs than `MAX_REPORTS`.
    TooManyReports,
    /// Report Size or Report Count does not fit the item model.
    FieldTooWide,
    /// No input report was declared at all.
    NoInputReport,
}

/// Reasons an attached device is rejected at attach time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DiscoveryError {
    /// The host stack has no parsed report information for the device.
    NoReportInfo,
    /// No relative Generic Desktop input field (X/Y) was found.
    AxisFieldMissing,
    /// No Button page input field was found.
    ButtonFieldMissing,
    /// Buttons and axes live in different reports.
    SplitReports,
    /// An item points at a report index the device did not declare.
    UnknownReport(u8),
    /// The containing report exceeds `MAX_REPORT_SIZE`.
    ReportTooLarge(u16),
}

/// Field extraction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Bit width outside 1..=32.
    InvalidBitLength(u8),
    /// Field count exceeds `MAX_FIELD_VALUES`.
    TooManyFields(u8),
    /// The field extends past the end of the received bytes.
    OutOfBounds,
    /// Fewer than two axis values were decoded.
    MissingAxis,
}

/// SPI link failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// The bus reported an error during the word exchange.
    Bus,
}

// Convenience conversions

impl From<DescriptorError> for Error {
    fn from(e: DescriptorError) -> Self {
        Error::Descriptor(e)
    }
}

impl From<DiscoveryError> for Error {
    fn from(e: DiscoveryError) -> Self {
        Error::Discovery(e)
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Error::Link(e)
    }
}
