//! In-memory display backend
//!
//! Keeps what a real controller would hold in DDRAM and CGRAM. Used by the
//! terminal simulator and by tests across the workspace.

use core::fmt::Write;

use heapless::String;
use panel_protocol::{Bitmap, Symbol, GLYPH_SLOTS, LINE_WIDTH};

use crate::backend::{DisplayBackend, DisplayError, RawLine};

/// Room for sixteen cells of up to four UTF-8 bytes
pub type TextLine = String<{ LINE_WIDTH * 4 }>;

/// Display contents held in memory
#[derive(Debug, Clone)]
pub struct MemoryDisplay {
    glyphs: [Option<Bitmap>; GLYPH_SLOTS],
    lines: [RawLine; 2],
    glyph_programs: usize,
    writes: usize,
    fail: bool,
}

impl Default for MemoryDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDisplay {
    /// Blank display with unprogrammed glyph slots
    pub const fn new() -> Self {
        Self {
            glyphs: [None; GLYPH_SLOTS],
            lines: [[b' '; LINE_WIDTH]; 2],
            glyph_programs: 0,
            writes: 0,
            fail: false,
        }
    }

    /// Make every following operation fail with `Communication`
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail = fail;
    }

    /// Bitmap programmed into `slot`
    pub fn glyph(&self, slot: u8) -> Option<Bitmap> {
        self.glyphs.get(slot as usize).copied().flatten()
    }

    /// Raw bytes of row 0 or 1
    pub fn raw_line(&self, row: usize) -> Option<&RawLine> {
        self.lines.get(row)
    }

    /// Number of glyph programming operations so far
    pub fn glyph_programs(&self) -> usize {
        self.glyph_programs
    }

    /// Number of screen writes so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Row decoded to text, with custom characters shown as the symbol they
    /// currently hold
    pub fn text_line(&self, row: usize) -> TextLine {
        let mut out = TextLine::new();
        let Some(line) = self.lines.get(row) else {
            return out;
        };
        for byte in line {
            let c = if (*byte as usize) < GLYPH_SLOTS {
                self.glyph(*byte)
                    .and_then(|bitmap| Symbol::from_bitmap(&bitmap))
                    .map(Symbol::fallback)
                    .unwrap_or('?')
            } else {
                *byte as char
            };
            let _ = out.write_char(c);
        }
        out
    }

    fn check(&self) -> Result<(), DisplayError> {
        if self.fail {
            Err(DisplayError::Communication)
        } else {
            Ok(())
        }
    }
}

impl DisplayBackend for MemoryDisplay {
    fn program_glyph(&mut self, slot: u8, bitmap: &Bitmap) -> Result<(), DisplayError> {
        self.check()?;
        let entry = self
            .glyphs
            .get_mut(slot as usize)
            .ok_or(DisplayError::InvalidSlot)?;
        *entry = Some(*bitmap);
        self.glyph_programs += 1;
        Ok(())
    }

    fn write(&mut self, line_one: &RawLine, line_two: &RawLine) -> Result<(), DisplayError> {
        self.check()?;
        self.lines = [*line_one, *line_two];
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.check()?;
        self.lines = [[b' '; LINE_WIDTH]; 2];
        Ok(())
    }
}
