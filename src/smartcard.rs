//! Smart-card interface declarations.
//!
//! Types a CCID reader backend would be written against: command codes,
//! APDU framing, card state, and the [`SmartCard`] trait. No backend is
//! provided here.

/// Card command instruction bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScCommand {
    StartSession,
    Authenticate,
    GetResponse,
    SubmitCode,
    ClearCard,
    SelectFile,
    ReadRecord,
    WriteRecord,
    Credit,
    Debit,
    Revoke,
    InquireAccount,
    ChangePin,
    Unsupported(u8),
}

impl ScCommand {
    pub fn code(&self) -> u8 {
        match self {
            ScCommand::StartSession => 0x84,
            ScCommand::Authenticate => 0x82,
            ScCommand::GetResponse => 0xC0,
            ScCommand::SubmitCode => 0x20,
            ScCommand::ClearCard => 0x30,
            ScCommand::SelectFile => 0xA4,
            ScCommand::ReadRecord => 0xB2,
            ScCommand::WriteRecord => 0xD2,
            ScCommand::Credit => 0xE2,
            ScCommand::Debit => 0xE6,
            ScCommand::Revoke => 0xE8,
            ScCommand::InquireAccount => 0xE4,
            ScCommand::ChangePin => 0x24,
            ScCommand::Unsupported(code) => *code,
        }
    }
}

impl From<u8> for ScCommand {
    fn from(code: u8) -> Self {
        match code {
            0x84 => ScCommand::StartSession,
            0x82 => ScCommand::Authenticate,
            0xC0 => ScCommand::GetResponse,
            0x20 => ScCommand::SubmitCode,
            0x30 => ScCommand::ClearCard,
            0xA4 => ScCommand::SelectFile,
            0xB2 => ScCommand::ReadRecord,
            0xD2 => ScCommand::WriteRecord,
            0xE2 => ScCommand::Credit,
            0xE6 => ScCommand::Debit,
            0xE8 => ScCommand::Revoke,
            0xE4 => ScCommand::InquireAccount,
            0x24 => ScCommand::ChangePin,
            other => ScCommand::Unsupported(other),
        }
    }
}

/// Command APDU header plus lengths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ApduCommand {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    /// Bytes of command data that follow.
    pub lc: u8,
    /// Bytes of response data expected.
    pub le: u8,
}

impl ApduCommand {
    pub fn new(cla: u8, command: ScCommand, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins: command.code(),
            p1,
            p2,
            lc: 0,
            le: 0,
        }
    }

    pub fn header(&self) -> [u8; 4] {
        [self.cla, self.ins, self.p1, self.p2]
    }

    pub fn command(&self) -> ScCommand {
        ScCommand::from(self.ins)
    }
}

/// Response APDU trailer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ApduResponse {
    pub sw1: u8,
    pub sw2: u8,
}

impl ApduResponse {
    pub const SUCCESS: u16 = 0x9000;

    pub fn status_word(&self) -> u16 {
        u16::from_be_bytes([self.sw1, self.sw2])
    }

    pub fn is_success(&self) -> bool {
        self.status_word() == Self::SUCCESS
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CardState {
    NotPresent,
    Active,
    Inactive,
}

impl CardState {
    pub fn code(&self) -> u8 {
        match self {
            CardState::NotPresent => 10,
            CardState::Active => 20,
            CardState::Inactive => 30,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            10 => Some(CardState::NotPresent),
            20 => Some(CardState::Active),
            30 => Some(CardState::Inactive),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScError {
    NoCard,
    /// Card did not answer reset.
    NoAtr,
    /// Protocol and parameter selection failed.
    PpsFailed,
    Timeout,
    /// Transmission error on the card interface.
    Parity,
    /// Response did not fit the caller's buffer.
    Overflow,
}

/// A card reader slot.
pub trait SmartCard {
    fn initialize(&mut self) -> Result<(), ScError>;

    fn card_present(&self) -> bool;

    fn card_state(&self) -> CardState;

    /// Power the card and read its Answer-To-Reset into `atr`.
    /// Returns the ATR length.
    fn power_on_atr(&mut self, atr: &mut [u8]) -> Result<usize, ScError>;

    fn do_pps(&mut self) -> Result<(), ScError>;

    /// Send `command` with `data` and read the response body into
    /// `response`. Returns the body length and the trailer.
    fn transact(
        &mut self,
        command: &ApduCommand,
        data: &[u8],
        response: &mut [u8],
    ) -> Result<(usize, ApduResponse), ScError>;

    fn shutdown(&mut self);
}
