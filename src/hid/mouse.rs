//! Mouse report decoding.
//!
//! Turns one raw input report into a [`MouseSample`] using the field
//! locations found by discovery:
//! ```text
//! buttons: any width/count on the Button page
//! X, Y:    first two values of the relative Generic Desktop field,
//!          taken as signed 8-bit deltas
//! ```

use bitflags::bitflags;

use super::decode::decode_field;
use super::discovery::MouseLayout;
use crate::error::DecodeError;

bitflags! {
    /// Pressed buttons, bit `n` = button `n + 1`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct MouseButtons: u16 {
        const LEFT     = 1 << 0;
        const RIGHT    = 1 << 1;
        const MIDDLE   = 1 << 2;
        const BUTTON_4 = 1 << 3;
        const BUTTON_5 = 1 << 4;
    }
}

impl MouseButtons {
    pub fn left(&self) -> bool {
        self.contains(Self::LEFT)
    }

    pub fn right(&self) -> bool {
        self.contains(Self::RIGHT)
    }

    pub fn middle(&self) -> bool {
        self.contains(Self::MIDDLE)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MouseButtons {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "MouseButtons({=u16:#x})", self.bits());
    }
}

/// One decoded mouse report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseSample {
    pub buttons: MouseButtons,
    /// Relative X movement.
    pub dx: i16,
    /// Relative Y movement.
    pub dy: i16,
}

impl MouseSample {
    /// No buttons held, no movement.
    pub fn is_idle(&self) -> bool {
        self.buttons.is_empty() && self.dx == 0 && self.dy == 0
    }
}

/// Decode one raw report.
///
/// Axis values wider than 8 bits are truncated to their low byte before
/// sign extension, so a 16-bit delta of 0x0105 reads as +5.
pub fn decode_sample(report: &[u8], layout: &MouseLayout) -> Result<MouseSample, DecodeError> {
    let buttons = decode_field(report, &layout.buttons)?;
    let axes = decode_field(report, &layout.axes)?;

    let (x, y) = match axes.as_slice() {
        [x, y, ..] => (*x, *y),
        _ => return Err(DecodeError::MissingAxis),
    };

    let mask = if buttons.len() == 1 {
        buttons[0] as u16
    } else {
        buttons
            .iter()
            .take(16)
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .fold(0u16, |acc, (i, _)| acc | (1 << i))
    };

    Ok(MouseSample {
        buttons: MouseButtons::from_bits_retain(mask),
        dx: i16::from(x as u8 as i8),
        dy: i16::from(y as u8 as i8),
    })
}
