//! HID report handling: descriptor model, field discovery and decoding.

pub mod decode;
pub mod descriptor;
pub mod discovery;
pub mod items;
pub mod mouse;

pub use decode::{decode_field, extract_bits, sign_extend, DecodedFields};
pub use descriptor::ReportLayout;
pub use discovery::{discover, MouseLayout, ReportFieldDescriptor};
pub use items::{DataModes, DeviceReportInfo, ReportInfo, ReportItem, ReportType, UsagePage};
pub use mouse::{decode_sample, MouseButtons, MouseSample};
