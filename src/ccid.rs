//! CCID class request dispatch.
//!
//! Filters control requests down to class requests aimed at the CCID
//! interface and routes the ones enabled in [`CcidCapabilities`] to a
//! [`CcidRequestHandler`]. The handler does the actual work.

use crate::config::{CcidCapabilities, CCID_INTERFACE_ID};

/// bmRequestType recipient field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Recipient {
    Device,
    Interface,
    Endpoint,
    Other,
    Reserved(u8),
}

/// bmRequestType type field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestKind {
    Standard,
    Class,
    Vendor,
    Reserved,
}

/// An 8-byte control SETUP packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetupPacket {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: u16,
}

impl SetupPacket {
    pub fn parse(raw: [u8; 8]) -> Self {
        Self {
            request_type: raw[0],
            request: raw[1],
            value: u16::from_le_bytes([raw[2], raw[3]]),
            index: u16::from_le_bytes([raw[4], raw[5]]),
            length: u16::from_le_bytes([raw[6], raw[7]]),
        }
    }

    pub fn recipient(&self) -> Recipient {
        match self.request_type & 0x1F {
            0 => Recipient::Device,
            1 => Recipient::Interface,
            2 => Recipient::Endpoint,
            3 => Recipient::Other,
            r => Recipient::Reserved(r),
        }
    }

    pub fn kind(&self) -> RequestKind {
        match (self.request_type >> 5) & 0x03 {
            0 => RequestKind::Standard,
            1 => RequestKind::Class,
            2 => RequestKind::Vendor,
            _ => RequestKind::Reserved,
        }
    }

    /// Device-to-host data stage.
    pub fn is_in(&self) -> bool {
        self.request_type & 0x80 != 0
    }

    /// Interface number for interface-directed requests.
    pub fn interface(&self) -> u8 {
        self.index as u8
    }
}

/// CCID class-specific requests (CCID 1.1, 5.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CcidRequest {
    Abort,
    GetClockFrequencies,
    GetDataRates,
    Unsupported(u8),
}

impl From<u8> for CcidRequest {
    fn from(code: u8) -> Self {
        match code {
            0x01 => CcidRequest::Abort,
            0x02 => CcidRequest::GetClockFrequencies,
            0x03 => CcidRequest::GetDataRates,
            other => CcidRequest::Unsupported(other),
        }
    }
}

/// Result of offering a SETUP packet to the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    /// Not a class request for the CCID interface; let someone else look.
    NotForUs,
    /// The handler accepted the request.
    Handled,
    /// Ours, but not something this build answers. Stall.
    Unsupported,
}

/// Does the work behind each supported request.
pub trait CcidRequestHandler {
    /// ABORT: `value` carries slot (low byte) and sequence (high byte).
    fn abort(&mut self, slot: u8, sequence: u8);

    /// GET_CLOCK_FREQUENCIES data stage.
    fn clock_frequencies(&mut self, setup: &SetupPacket);

    /// GET_DATA_RATES data stage.
    fn data_rates(&mut self, setup: &SetupPacket);
}

pub struct CcidDispatcher {
    interface: u8,
    caps: CcidCapabilities,
}

impl CcidDispatcher {
    pub fn new(interface: u8, caps: CcidCapabilities) -> Self {
        Self { interface, caps }
    }

    pub fn capabilities(&self) -> &CcidCapabilities {
        &self.caps
    }

    /// Route `setup` to `handler` if it is a CCID class request we answer.
    pub fn check_request<H: CcidRequestHandler>(
        &self,
        setup: &SetupPacket,
        handler: &mut H,
    ) -> Dispatch {
        if setup.recipient() != Recipient::Interface
            || setup.kind() != RequestKind::Class
            || setup.interface() != self.interface
        {
            return Dispatch::NotForUs;
        }

        match CcidRequest::from(setup.request) {
            CcidRequest::Abort if self.caps.abort => {
                let [slot, sequence] = setup.value.to_le_bytes();
                debug!("CCID abort slot {} seq {}", slot, sequence);
                handler.abort(slot, sequence);
                Dispatch::Handled
            }
            CcidRequest::GetClockFrequencies if self.caps.clock_frequencies => {
                handler.clock_frequencies(setup);
                Dispatch::Handled
            }
            CcidRequest::GetDataRates if self.caps.data_rates => {
                handler.data_rates(setup);
                Dispatch::Handled
            }
            request => {
                debug!("CCID request {} unsupported", request);
                Dispatch::Unsupported
            }
        }
    }
}

impl Default for CcidDispatcher {
    fn default() -> Self {
        Self::new(CCID_INTERFACE_ID, CcidCapabilities::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        aborts: std::vec::Vec<(u8, u8)>,
        clocks: usize,
        rates: usize,
    }

    impl CcidRequestHandler for Recorder {
        fn abort(&mut self, slot: u8, sequence: u8) {
            self.aborts.push((slot, sequence));
        }

        fn clock_frequencies(&mut self, _setup: &SetupPacket) {
            self.clocks += 1;
        }

        fn data_rates(&mut self, _setup: &SetupPacket) {
            self.rates += 1;
        }
    }

    /// Class, interface-directed, host-to-device.
    fn class_request(request: u8, value: u16, interface: u16) -> SetupPacket {
        let v = value.to_le_bytes();
        let i = interface.to_le_bytes();
        SetupPacket::parse([0x21, request, v[0], v[1], i[0], i[1], 0, 0])
    }

    #[test]
    fn parses_setup_fields() {
        let setup = SetupPacket::parse([0xA1, 0x02, 0x00, 0x00, 0x03, 0x00, 0x10, 0x00]);
        assert_eq!(setup.recipient(), Recipient::Interface);
        assert_eq!(setup.kind(), RequestKind::Class);
        assert!(setup.is_in());
        assert_eq!(setup.interface(), 3);
        assert_eq!(setup.length, 16);
    }

    #[test]
    fn abort_is_routed() {
        let dispatcher = CcidDispatcher::default();
        let mut handler = Recorder::default();
        let setup = class_request(0x01, 0x0702, 0);
        assert_eq!(dispatcher.check_request(&setup, &mut handler), Dispatch::Handled);
        assert_eq!(handler.aborts, [(0x02, 0x07)]);
    }

    #[test]
    fn disabled_requests_are_unsupported() {
        let dispatcher = CcidDispatcher::default();
        let mut handler = Recorder::default();
        assert_eq!(
            dispatcher.check_request(&class_request(0x02, 0, 0), &mut handler),
            Dispatch::Unsupported
        );
        assert_eq!(
            dispatcher.check_request(&class_request(0x03, 0, 0), &mut handler),
            Dispatch::Unsupported
        );
        assert_eq!(handler.clocks + handler.rates, 0);
    }

    #[test]
    fn enabled_capabilities_are_routed() {
        let caps = CcidCapabilities {
            abort: false,
            clock_frequencies: true,
            data_rates: true,
        };
        let dispatcher = CcidDispatcher::new(0, caps);
        let mut handler = Recorder::default();
        assert_eq!(
            dispatcher.check_request(&class_request(0x02, 0, 0), &mut handler),
            Dispatch::Handled
        );
        assert_eq!(
            dispatcher.check_request(&class_request(0x03, 0, 0), &mut handler),
            Dispatch::Handled
        );
        assert_eq!(
            dispatcher.check_request(&class_request(0x01, 0, 0), &mut handler),
            Dispatch::Unsupported
        );
        assert_eq!((handler.clocks, handler.rates), (1, 1));
        assert!(handler.aborts.is_empty());
    }

    #[test]
    fn unknown_request_code() {
        assert_eq!(CcidRequest::from(0x7F), CcidRequest::Unsupported(0x7F));
        let dispatcher = CcidDispatcher::default();
        let mut handler = Recorder::default();
        assert_eq!(
            dispatcher.check_request(&class_request(0x7F, 0, 0), &mut handler),
            Dispatch::Unsupported
        );
    }

    #[test]
    fn filters_foreign_requests() {
        let dispatcher = CcidDispatcher::new(2, CcidCapabilities::default());
        let mut handler = Recorder::default();

        // Wrong interface.
        assert_eq!(
            dispatcher.check_request(&class_request(0x01, 0, 1), &mut handler),
            Dispatch::NotForUs
        );
        // Standard request (GET_STATUS to interface 2).
        let standard = SetupPacket::parse([0x81, 0x00, 0, 0, 2, 0, 2, 0]);
        assert_eq!(dispatcher.check_request(&standard, &mut handler), Dispatch::NotForUs);
        // Class request to the device.
        let device = SetupPacket::parse([0x20, 0x01, 0, 0, 2, 0, 0, 0]);
        assert_eq!(dispatcher.check_request(&device, &mut handler), Dispatch::NotForUs);

        assert!(handler.aborts.is_empty());
    }
}
