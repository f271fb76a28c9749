//! Logical symbols and their glyph bitmaps
//!
//! Each symbol is a 5x8 custom character. Rows are listed top to bottom,
//! the low five bits of each byte are the pixels.

/// Number of programmable glyph slots on an HD44780 class display
pub const GLYPH_SLOTS: usize = 8;

/// Number of logical symbols
pub const SYMBOL_COUNT: usize = 11;

/// One glyph: eight rows of five pixels
pub type Bitmap = [u8; 8];

/// Logical symbols available to messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// `\` (the character ROM has ¥ at 0x5C)
    Backslash,
    UpArrow,
    DownArrow,
    /// Small "AM" marker used by the clock
    Am,
    /// Small "PM" marker used by the clock
    Pm,
    /// Degrees Fahrenheit
    Fahrenheit,
    Moon,
    Sun,
    LeftArrow,
    RightArrow,
    /// Degrees Celsius
    Celsius,
}

impl Symbol {
    /// All symbols in id order. The first [`GLYPH_SLOTS`] are loaded at boot.
    pub const ALL: [Symbol; SYMBOL_COUNT] = [
        Symbol::Backslash,
        Symbol::UpArrow,
        Symbol::DownArrow,
        Symbol::Am,
        Symbol::Pm,
        Symbol::Fahrenheit,
        Symbol::Moon,
        Symbol::Sun,
        Symbol::LeftArrow,
        Symbol::RightArrow,
        Symbol::Celsius,
    ];

    /// Stable numeric id
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Look up a symbol by id
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Pixel rows for this symbol
    pub const fn bitmap(self) -> Bitmap {
        match self {
            Symbol::Backslash => [0, 0, 16, 8, 4, 2, 1, 0],
            Symbol::UpArrow => [0, 0, 4, 14, 31, 0, 0, 0],
            Symbol::DownArrow => [0, 0, 31, 14, 4, 0, 0, 0],
            Symbol::Am => [4, 10, 14, 10, 0, 10, 21, 17],
            Symbol::Pm => [12, 10, 12, 8, 0, 10, 21, 17],
            Symbol::Fahrenheit => [24, 24, 7, 4, 7, 4, 4, 0],
            Symbol::Moon => [0, 14, 31, 31, 31, 14, 0, 0],
            Symbol::Sun => [0, 14, 17, 17, 17, 14, 0, 0],
            Symbol::LeftArrow => [0, 2, 6, 14, 6, 2, 0, 0],
            Symbol::RightArrow => [0, 8, 12, 14, 12, 8, 0, 0],
            Symbol::Celsius => [24, 24, 6, 9, 8, 9, 6, 0],
        }
    }

    /// Reverse lookup from a programmed bitmap
    ///
    /// Used by backends that only see slot contents, such as the terminal
    /// simulator.
    pub fn from_bitmap(bitmap: &Bitmap) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.bitmap() == *bitmap)
    }

    /// Closest printable stand-in for text output
    pub const fn fallback(self) -> char {
        match self {
            Symbol::Backslash => '\\',
            Symbol::UpArrow => '↑',
            Symbol::DownArrow => '↓',
            Symbol::Am => 'ᵃ',
            Symbol::Pm => 'ᵖ',
            Symbol::Fahrenheit => '℉',
            Symbol::Moon => '●',
            Symbol::Sun => '○',
            Symbol::LeftArrow => '◂',
            Symbol::RightArrow => '▸',
            Symbol::Celsius => '℃',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_match_table_order() {
        for (i, symbol) in Symbol::ALL.iter().enumerate() {
            assert_eq!(symbol.id() as usize, i);
            assert_eq!(Symbol::from_id(i as u8), Some(*symbol));
        }
        assert_eq!(Symbol::from_id(Symbol::ALL.len() as u8), None);
    }

    #[test]
    fn test_bitmaps_are_unique() {
        for a in Symbol::ALL {
            for b in Symbol::ALL {
                if a != b {
                    assert_ne!(a.bitmap(), b.bitmap(), "{:?} and {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_bitmaps_fit_five_columns() {
        for symbol in Symbol::ALL {
            assert!(symbol.bitmap().iter().all(|row| *row < 32));
        }
    }

    #[test]
    fn test_from_bitmap() {
        assert_eq!(Symbol::from_bitmap(&Symbol::Moon.bitmap()), Some(Symbol::Moon));
        assert_eq!(Symbol::from_bitmap(&[0xFF; 8]), None);
    }
}
