//! Display backend trait
//!
//! Defines the interface a character display has to offer.

use core::fmt;

use panel_protocol::{Bitmap, GLYPH_SLOTS, LINE_WIDTH};

/// One line as sent to the controller: printable ASCII or a slot number (0..8)
pub type RawLine = [u8; LINE_WIDTH];

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// A message used more distinct symbols than there are glyph slots
    TooManyGlyphs,
    /// Glyph slot out of range
    InvalidSlot,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::Communication => f.write_str("display communication failed"),
            DisplayError::TooManyGlyphs => {
                write!(f, "message needs more than {} glyph slots", GLYPH_SLOTS)
            }
            DisplayError::InvalidSlot => f.write_str("glyph slot out of range"),
        }
    }
}

/// Display backend trait
///
/// Provides a hardware-agnostic interface to a two-line character display.
/// Implementations handle the bus specifics (4-bit parallel, I2C expander,
/// terminal simulation).
pub trait DisplayBackend {
    /// Program custom character `slot` (0..8) with an 8-row bitmap
    fn program_glyph(&mut self, slot: u8, bitmap: &Bitmap) -> Result<(), DisplayError>;

    /// Replace the whole screen with two 16-byte lines
    ///
    /// Bytes below [`GLYPH_SLOTS`] select a custom character.
    fn write(&mut self, line_one: &RawLine, line_two: &RawLine) -> Result<(), DisplayError>;

    /// Clear the entire display
    fn clear(&mut self) -> Result<(), DisplayError>;
}

impl<T: DisplayBackend + ?Sized> DisplayBackend for &mut T {
    fn program_glyph(&mut self, slot: u8, bitmap: &Bitmap) -> Result<(), DisplayError> {
        (**self).program_glyph(slot, bitmap)
    }

    fn write(&mut self, line_one: &RawLine, line_two: &RawLine) -> Result<(), DisplayError> {
        (**self).write(line_one, line_two)
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        (**self).clear()
    }
}
