//! Key events from the 4x4 button matrix

/// Number of buttons on the keypad
pub const BUTTON_COUNT: usize = 16;

/// Printed labels in row-major matrix order
const LABELS: [u8; BUTTON_COUNT] = *b"123A456B789C*0#D";

/// A physical button, identified by its matrix index (0..16)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ButtonLabel(u8);

impl ButtonLabel {
    pub const ONE: Self = Self(0);
    pub const TWO: Self = Self(1);
    pub const THREE: Self = Self(2);
    pub const A: Self = Self(3);
    pub const FOUR: Self = Self(4);
    pub const FIVE: Self = Self(5);
    pub const SIX: Self = Self(6);
    pub const B: Self = Self(7);
    pub const SEVEN: Self = Self(8);
    pub const EIGHT: Self = Self(9);
    pub const NINE: Self = Self(10);
    pub const C: Self = Self(11);
    pub const STAR: Self = Self(12);
    pub const ZERO: Self = Self(13);
    pub const HASH: Self = Self(14);
    pub const D: Self = Self(15);

    /// Previous item in a submenu
    pub const PREVIOUS: Self = Self::TWO;
    /// Next item in a submenu
    pub const NEXT: Self = Self::EIGHT;
    /// Leave the current frame
    pub const BACK: Self = Self::STAR;
    /// Commit numeric entry
    pub const CONFIRM: Self = Self::HASH;

    /// Create from a matrix index
    pub fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < BUTTON_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Look up a button by its printed label (case insensitive for A-D)
    pub fn from_char(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        LABELS
            .iter()
            .position(|&l| l as char == c)
            .map(|i| Self(i as u8))
    }

    /// Matrix index (row * 4 + column)
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Printed label
    pub const fn as_char(self) -> char {
        LABELS[self.0 as usize] as char
    }

    /// Value of a digit key, `None` for letters, `*` and `#`
    pub fn digit(self) -> Option<u8> {
        self.as_char().to_digit(10).map(|d| d as u8)
    }

    /// All sixteen buttons in matrix order
    pub fn all() -> impl Iterator<Item = ButtonLabel> {
        (0..BUTTON_COUNT as u8).map(Self)
    }
}

/// Edge reported by the input driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Button that changed
    pub label: ButtonLabel,
    /// `true` on press, `false` on release
    pub pressed: bool,
}

impl KeyEvent {
    pub const fn press(label: ButtonLabel) -> Self {
        Self {
            label,
            pressed: true,
        }
    }

    pub const fn release(label: ButtonLabel) -> Self {
        Self {
            label,
            pressed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_order() {
        let printed: heapless::String<16> = ButtonLabel::all().map(|b| b.as_char()).collect();
        assert_eq!(printed.as_str(), "123A456B789C*0#D");
    }

    #[test]
    fn test_from_char() {
        assert_eq!(ButtonLabel::from_char('a'), Some(ButtonLabel::A));
        assert_eq!(ButtonLabel::from_char('#'), Some(ButtonLabel::CONFIRM));
        assert_eq!(ButtonLabel::from_char('0'), Some(ButtonLabel::ZERO));
        assert_eq!(ButtonLabel::from_char('x'), None);
    }

    #[test]
    fn test_navigation_aliases() {
        assert_eq!(ButtonLabel::PREVIOUS.as_char(), '2');
        assert_eq!(ButtonLabel::NEXT.as_char(), '8');
        assert_eq!(ButtonLabel::BACK.as_char(), '*');
        assert_eq!(ButtonLabel::CONFIRM.as_char(), '#');
    }

    #[test]
    fn test_digits() {
        assert_eq!(ButtonLabel::SEVEN.digit(), Some(7));
        assert_eq!(ButtonLabel::ZERO.digit(), Some(0));
        assert_eq!(ButtonLabel::D.digit(), None);
        assert_eq!(ButtonLabel::STAR.digit(), None);
    }

    #[test]
    fn test_from_index_bounds() {
        assert_eq!(ButtonLabel::from_index(15), Some(ButtonLabel::D));
        assert_eq!(ButtonLabel::from_index(16), None);
    }
}
