//! Two-line display messages
//!
//! A [`Message`] is what the display surface renders: two [`Line`]s of at
//! most [`LINE_WIDTH`] render units. Every piece of text enters through
//! [`Line::from_text`] or the `fmt::Write` impl, which normalise it to what
//! the character ROM can show.

use core::fmt;

use heapless::Vec;

use crate::symbols::{Symbol, GLYPH_SLOTS, SYMBOL_COUNT};

/// Render units per line
pub const LINE_WIDTH: usize = 16;

/// Distinct symbols a single message may use
pub const MAX_SYMBOLS_PER_MESSAGE: usize = GLYPH_SLOTS;

/// One render unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Printable ASCII byte (0x20..=0x7E, never 0x5C)
    Char(u8),
    /// Custom glyph resolved through the glyph cache at render time
    Glyph(Symbol),
}

impl Cell {
    pub const SPACE: Cell = Cell::Char(b' ');

    /// Normalise one input character
    ///
    /// `\t` becomes a space, `\` becomes the backslash glyph, the fallback
    /// characters of symbols map back to their glyph, anything else outside
    /// printable ASCII becomes `?`.
    pub fn from_char(c: char) -> Cell {
        match c {
            '\t' => Cell::SPACE,
            '\\' => Cell::Glyph(Symbol::Backslash),
            ' '..='~' => Cell::Char(c as u8),
            _ => match Symbol::ALL.iter().find(|s| s.fallback() == c) {
                Some(symbol) => Cell::Glyph(*symbol),
                None => Cell::Char(b'?'),
            },
        }
    }

    fn is_space(self) -> bool {
        self == Cell::SPACE
    }
}

impl From<Symbol> for Cell {
    fn from(symbol: Symbol) -> Self {
        Cell::Glyph(symbol)
    }
}

/// How a line is laid out on construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Kept as given
    #[default]
    None,
    /// Leading spaces stripped
    Left,
    /// Left-padded to the full width
    Right,
    /// Padded on both sides, odd remainder on the right
    Center,
}

/// One display line of up to [`LINE_WIDTH`] cells
///
/// Writes past the end are dropped silently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    cells: Vec<Cell, LINE_WIDTH>,
}

impl Line {
    /// Create an empty line
    pub const fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Build a line from text, truncating to [`LINE_WIDTH`]
    pub fn from_text(text: &str) -> Self {
        let mut line = Self::new();
        line.push_str(text);
        line
    }

    /// Append a cell; returns false when the line is full
    pub fn push(&mut self, cell: impl Into<Cell>) -> bool {
        self.cells.push(cell.into()).is_ok()
    }

    /// Append normalised text; characters past the width are dropped
    pub fn push_str(&mut self, text: &str) {
        for c in text.chars() {
            if !self.push(Cell::from_char(c)) {
                break;
            }
        }
    }

    /// Append `count` spaces (bounded by the free width)
    pub fn push_spaces(&mut self, count: usize) {
        for _ in 0..count {
            if !self.push(Cell::SPACE) {
                break;
            }
        }
    }

    /// Append another line's cells
    pub fn extend(&mut self, other: &Line) {
        for cell in other.cells() {
            if !self.push(*cell) {
                break;
            }
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Free cells before the line is full
    pub fn remaining(&self) -> usize {
        LINE_WIDTH - self.cells.len()
    }

    /// Keep only the first `len` cells
    pub fn truncate(&mut self, len: usize) {
        self.cells.truncate(len);
    }

    /// Right-pad with spaces up to `width`
    pub fn pad_to(&mut self, width: usize) {
        let width = width.min(LINE_WIDTH);
        if self.len() < width {
            self.push_spaces(width - self.len());
        }
    }

    /// Return the line laid out per `align`
    pub fn aligned(&self, align: Align) -> Line {
        match align {
            Align::None => self.clone(),
            Align::Left => {
                let start = self
                    .cells
                    .iter()
                    .position(|c| !c.is_space())
                    .unwrap_or(self.len());
                let mut out = Line::new();
                for cell in &self.cells[start..] {
                    out.push(*cell);
                }
                out
            }
            Align::Right => {
                let mut out = Line::new();
                out.push_spaces(LINE_WIDTH - self.len());
                out.extend(self);
                out
            }
            Align::Center => {
                let free = LINE_WIDTH - self.len();
                let mut out = Line::new();
                out.push_spaces(free / 2);
                out.extend(self);
                out.pad_to(LINE_WIDTH);
                out
            }
        }
    }

    /// Symbols used by this line, in order of appearance (with repeats)
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.cells.iter().filter_map(|c| match c {
            Cell::Glyph(s) => Some(*s),
            Cell::Char(_) => None,
        })
    }

    /// Whether the line contains only spaces
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_space())
    }
}

impl fmt::Write for Line {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            match cell {
                Cell::Char(b) => fmt::Write::write_char(f, *b as char)?,
                Cell::Glyph(s) => fmt::Write::write_char(f, s.fallback())?,
            }
        }
        Ok(())
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Line::from_text(text)
    }
}

/// Two lines of display content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub line_one: Line,
    pub line_two: Line,
}

impl Message {
    /// Build a message from two already-built lines
    pub fn new(line_one: Line, line_two: Line) -> Self {
        Self { line_one, line_two }
    }

    /// Build a message from text
    ///
    /// When `line_two` is empty and `line_one` contains a newline, the text
    /// is split at the first newline.
    pub fn text(line_one: &str, line_two: &str) -> Self {
        if line_two.is_empty() {
            if let Some((one, two)) = line_one.split_once('\n') {
                let two = two.split('\n').next().unwrap_or("");
                return Self::new(Line::from_text(one), Line::from_text(two));
            }
        }
        Self::new(Line::from_text(line_one), Line::from_text(line_two))
    }

    /// Build a message from text with per-line alignment
    pub fn aligned(line_one: &str, line_two: &str, align_one: Align, align_two: Align) -> Self {
        Self::text(line_one, line_two).align(align_one, align_two)
    }

    /// Re-lay out both lines
    pub fn align(self, align_one: Align, align_two: Align) -> Self {
        Self {
            line_one: self.line_one.aligned(align_one),
            line_two: self.line_two.aligned(align_two),
        }
    }

    /// Add the submenu scroll hint (`2↑` / `8↓`) to the right edge
    pub fn with_arrows(mut self) -> Self {
        for (line, key, arrow) in [
            (&mut self.line_one, b'2', Symbol::UpArrow),
            (&mut self.line_two, b'8', Symbol::DownArrow),
        ] {
            line.pad_to(LINE_WIDTH);
            line.truncate(LINE_WIDTH - 2);
            line.push(Cell::Char(key));
            line.push(arrow);
        }
        self
    }

    /// Distinct symbols across both lines, in first-use order
    pub fn distinct_symbols(&self) -> Vec<Symbol, SYMBOL_COUNT> {
        let mut seen: Vec<Symbol, SYMBOL_COUNT> = Vec::new();
        for symbol in self.line_one.symbols().chain(self.line_two.symbols()) {
            if !seen.contains(&symbol) {
                // Capacity equals the number of symbols, cannot overflow
                let _ = seen.push(symbol);
            }
        }
        seen
    }

    /// Whether the message fits in the glyph slots
    pub fn fits_glyph_slots(&self) -> bool {
        self.distinct_symbols().len() <= MAX_SYMBOLS_PER_MESSAGE
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.line_one, self.line_two)
    }
}
