//! Numeric entry buffer
//!
//! Collects up to three digits for a monitor setting. The entry is tied to
//! the frame that shows it, so a commit for a frame that has already been
//! dismissed cannot reach the monitor.

use core::fmt::Write;

use heapless::String;
use panel_protocol::{Align, Line};

use crate::frame::FrameKey;

/// Digits kept in the buffer; further presses are ignored
pub const MAX_DIGITS: usize = 3;

/// Monitor setting a numeric entry will change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericTarget {
    Volume,
    Brightness,
}

impl NumericTarget {
    /// Title shown on the entry frame
    pub fn title(self) -> &'static str {
        match self {
            NumericTarget::Volume => "SET VOLUME",
            NumericTarget::Brightness => "SET BRIGHTNESS",
        }
    }
}

/// In-progress numeric entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericEntry {
    key: FrameKey,
    target: NumericTarget,
    as_percent: bool,
    digits: String<MAX_DIGITS>,
}

impl NumericEntry {
    pub fn new(key: FrameKey, target: NumericTarget, as_percent: bool) -> Self {
        Self {
            key,
            target,
            as_percent,
            digits: String::new(),
        }
    }

    /// Frame showing this entry
    pub fn key(&self) -> FrameKey {
        self.key
    }

    pub fn target(&self) -> NumericTarget {
        self.target
    }

    /// Append a digit; returns false when the buffer is full
    pub fn push_digit(&mut self, digit: u8) -> bool {
        match char::from_digit(u32::from(digit), 10) {
            Some(c) => self.digits.push(c).is_ok(),
            None => false,
        }
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Value to commit: empty is 0, percentages are clamped to 100
    pub fn value(&self) -> u16 {
        let raw = self.digits.parse::<u16>().unwrap_or(0);
        if self.as_percent {
            raw.min(100)
        } else {
            raw
        }
    }

    /// Value as a monitor percentage, saturating at 100 even for entries
    /// not shown as percentages
    pub fn percent(&self) -> u8 {
        self.value().min(100) as u8
    }

    /// Second display line: the value right-justified, `NN%` for percentages
    pub fn display_line(&self) -> Line {
        let mut line = Line::new();
        if self.digits.is_empty() {
            return line;
        }
        if self.as_percent {
            let _ = write!(line, "{}%", self.value());
        } else {
            line.push_str(&self.digits);
        }
        line.aligned(Align::Right)
    }
}
