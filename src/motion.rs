//! Relative-to-absolute cursor integration.
//!
//! The mouse reports signed deltas; the consumer wants an absolute position
//! inside a fixed viewport. Every update saturates at the viewport edges so
//! the position never wraps.

use crate::config::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

/// Absolute cursor position. Always within `[0, width] x [0, height]`.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CursorPosition {
    pub x: i16,
    pub y: i16,
}

impl CursorPosition {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Inclusive bounds for the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Viewport {
    pub width: i16,
    pub height: i16,
}

impl Viewport {
    /// 640x480, matching the consumer's display.
    pub const DEFAULT: Self = Self {
        width: VIEWPORT_WIDTH,
        height: VIEWPORT_HEIGHT,
    };

    /// Apply a relative move and clamp the result to this viewport.
    pub fn integrate(&self, previous: CursorPosition, dx: i16, dy: i16) -> CursorPosition {
        CursorPosition {
            x: clamp_axis(previous.x, dx, self.width),
            y: clamp_axis(previous.y, dy, self.height),
        }
    }

    pub fn contains(&self, position: CursorPosition) -> bool {
        (0..=self.width).contains(&position.x) && (0..=self.height).contains(&position.y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Integrate a relative move inside the default 640x480 viewport.
pub fn integrate(previous: CursorPosition, dx: i16, dy: i16) -> CursorPosition {
    Viewport::DEFAULT.integrate(previous, dx, dy)
}

fn clamp_axis(current: i16, delta: i16, max: i16) -> i16 {
    // Widen first: i16 + i16 can overflow before the clamp sees it.
    let moved = i32::from(current) + i32::from(delta);
    moved.clamp(0, i32::from(max.max(0))) as i16
}
