//! Position forwarding over SPI.
//!
//! Each update is a single 32-bit word, sent most significant byte first:
//! ```text
//! bits 31..16: X (i16, two's complement)
//! bits 15..0:  Y (i16, two's complement)
//! ```
//! The consumer shifts its reply out during the same transfer; it is
//! returned to the caller but otherwise unused.

use embedded_hal::spi::{Mode, SpiBus};

use crate::config::{LINK_FREQUENCY_HZ, LINK_MODE};
use crate::error::LinkError;
use crate::motion::CursorPosition;

/// Bus parameters the link expects the SPI peripheral to be set up with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkConfig {
    pub frequency_hz: u32,
    pub mode: Mode,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            frequency_hz: LINK_FREQUENCY_HZ,
            mode: LINK_MODE,
        }
    }
}

/// Pack a position into the on-wire word.
pub fn pack_position(position: CursorPosition) -> u32 {
    (u32::from(position.x as u16) << 16) | u32::from(position.y as u16)
}

/// Inverse of [`pack_position`].
pub fn unpack_position(word: u32) -> CursorPosition {
    CursorPosition {
        x: (word >> 16) as u16 as i16,
        y: word as u16 as i16,
    }
}

/// A full-duplex link that moves one 32-bit word per exchange.
pub trait WordLink {
    type Error;

    /// Send `word` and return whatever the far side shifted back.
    fn exchange(&mut self, word: u32) -> Result<u32, Self::Error>;
}

/// [`WordLink`] over an `embedded-hal` SPI bus.
pub struct SpiLink<SPI> {
    spi: SPI,
    config: LinkConfig,
}

impl<SPI: SpiBus<u8>> SpiLink<SPI> {
    /// Wrap a bus that has already been configured per `config`.
    pub fn new(spi: SPI, config: LinkConfig) -> Self {
        Self { spi, config }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Give the bus back.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiBus<u8>> WordLink for SpiLink<SPI> {
    type Error = LinkError;

    fn exchange(&mut self, word: u32) -> Result<u32, LinkError> {
        let mut buf = word.to_be_bytes();
        self.spi
            .transfer_in_place(&mut buf)
            .map_err(|_| LinkError::Bus)?;
        self.spi.flush().map_err(|_| LinkError::Bus)?;
        Ok(u32::from_be_bytes(buf))
    }
}

/// Pack and send a cursor position.
pub fn forward_position<L: WordLink>(link: &mut L, position: CursorPosition) -> Result<u32, L::Error> {
    link.exchange(pack_position(position))
}
