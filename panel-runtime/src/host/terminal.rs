//! Terminal display
//!
//! Simulates the 16x2 panel on stdout. Contents are kept in a
//! `MemoryDisplay` so custom characters are drawn as whatever symbol their
//! slot currently holds, exactly like the glass would show them.

use std::io::{self, Write};

use panel_display::{DisplayBackend, DisplayError, MemoryDisplay, RawLine};
use panel_protocol::{Bitmap, LINE_WIDTH};

/// 16x2 box drawn on a terminal
pub struct TerminalDisplay<W: Write = io::Stdout> {
    memory: MemoryDisplay,
    out: W,
}

impl TerminalDisplay {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            memory: MemoryDisplay::new(),
            out,
        }
    }

    /// Underlying display memory
    pub fn memory(&self) -> &MemoryDisplay {
        &self.memory
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self) -> io::Result<()> {
        let rule = "─".repeat(LINE_WIDTH);
        writeln!(self.out, "┌{}┐", rule)?;
        for row in 0..2 {
            writeln!(self.out, "│{}│", self.memory.text_line(row))?;
        }
        writeln!(self.out, "└{}┘", rule)?;
        self.out.flush()
    }
}

impl<W: Write> DisplayBackend for TerminalDisplay<W> {
    fn program_glyph(&mut self, slot: u8, bitmap: &Bitmap) -> Result<(), DisplayError> {
        self.memory.program_glyph(slot, bitmap)
    }

    fn write(&mut self, line_one: &RawLine, line_two: &RawLine) -> Result<(), DisplayError> {
        self.memory.write(line_one, line_two)?;
        self.draw().map_err(|_| DisplayError::Communication)
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.memory.clear()?;
        self.draw().map_err(|_| DisplayError::Communication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_display::Surface;
    use panel_protocol::{Message, Symbol};

    #[test]
    fn test_draws_box_with_symbols() {
        let mut surface = Surface::new(TerminalDisplay::new(Vec::new())).unwrap();
        surface
            .render(&Message::text("Main Menu", "").with_arrows())
            .unwrap();
        let out = String::from_utf8(surface.backend().out.clone()).unwrap();
        let last_frame: Vec<&str> = out.lines().rev().take(4).collect();
        assert_eq!(last_frame[3], "┌────────────────┐");
        assert_eq!(last_frame[2], "│Main Menu     2↑│");
        assert_eq!(last_frame[1], "│              8↓│");
        assert_eq!(last_frame[0], "└────────────────┘");
    }

    #[test]
    fn test_memory_follows_writes() {
        let mut display = TerminalDisplay::new(Vec::new());
        display.program_glyph(0, &Symbol::Sun.bitmap()).unwrap();
        display.write(b"\x00               ", b"                ").unwrap();
        assert_eq!(display.memory().text_line(0).as_str(), "○               ");
    }
}
