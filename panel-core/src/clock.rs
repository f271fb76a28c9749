//! Wall clock helpers
//!
//! The console shows local time with a fixed UTC offset taken from the
//! configuration. Only the time of day is needed.

use core::fmt::Write;

use panel_protocol::{Line, Symbol};

const SECS_PER_DAY: i64 = 86_400;

/// Time of day in the configured zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl LocalTime {
    /// Convert a Unix timestamp to local time of day
    pub fn from_unix(unix_secs: i64, utc_offset_minutes: i16) -> Self {
        let local = unix_secs + i64::from(utc_offset_minutes) * 60;
        let secs = local.rem_euclid(SECS_PER_DAY);
        Self {
            hour: (secs / 3600) as u8,
            minute: ((secs % 3600) / 60) as u8,
            second: (secs % 60) as u8,
        }
    }

    /// Hour on a 12-hour dial (1..=12)
    pub fn hour12(&self) -> u8 {
        match self.hour % 12 {
            0 => 12,
            h => h,
        }
    }

    pub fn is_pm(&self) -> bool {
        self.hour >= 12
    }

    /// `Am` or `Pm` glyph
    pub fn meridiem(&self) -> Symbol {
        if self.is_pm() {
            Symbol::Pm
        } else {
            Symbol::Am
        }
    }

    /// `h:mm` followed by the AM/PM glyph, no leading zero on the hour
    pub fn to_line(&self) -> Line {
        let mut line = Line::new();
        let _ = write!(line, "{}:{:02}", self.hour12(), self.minute);
        line.push(self.meridiem());
        line
    }
}

/// Seconds until the next wall-clock minute starts (1..=60)
pub fn seconds_until_next_minute(unix_secs: i64) -> u64 {
    (60 - unix_secs.rem_euclid(60)) as u64
}

/// Whether `minute` is a quarter-hour boundary
pub fn is_quarter_hour(minute: u8) -> bool {
    minute % 15 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_protocol::Cell;

    #[test]
    fn test_from_unix_utc() {
        // 2024-01-01T13:05:09Z
        let t = LocalTime::from_unix(1_704_114_309, 0);
        assert_eq!((t.hour, t.minute, t.second), (13, 5, 9));
        assert!(t.is_pm());
        assert_eq!(t.hour12(), 1);
    }

    #[test]
    fn test_negative_offset_wraps_day() {
        // 02:00Z at UTC-5 is 21:00 the previous day
        let t = LocalTime::from_unix(2 * 3600, -300);
        assert_eq!(t.hour, 21);
        assert_eq!(t.hour12(), 9);
    }

    #[test]
    fn test_midnight_and_noon() {
        assert_eq!(LocalTime::from_unix(0, 0).hour12(), 12);
        assert_eq!(LocalTime::from_unix(0, 0).meridiem(), Symbol::Am);
        assert_eq!(LocalTime::from_unix(12 * 3600, 0).meridiem(), Symbol::Pm);
    }

    #[test]
    fn test_to_line() {
        let t = LocalTime::from_unix(9 * 3600 + 7 * 60, 0);
        let line = t.to_line();
        assert_eq!(line.len(), 5);
        assert_eq!(line.cells()[0], Cell::Char(b'9'));
        assert_eq!(line.cells()[2], Cell::Char(b'0'));
        assert_eq!(line.cells()[4], Cell::Glyph(Symbol::Am));

        let t = LocalTime::from_unix(23 * 3600 + 59 * 60, 0);
        assert_eq!(t.to_line().len(), 6);
    }

    #[test]
    fn test_seconds_until_next_minute() {
        assert_eq!(seconds_until_next_minute(120), 60);
        assert_eq!(seconds_until_next_minute(121), 59);
        assert_eq!(seconds_until_next_minute(179), 1);
    }

    #[test]
    fn test_quarter_hour() {
        assert!(is_quarter_hour(0));
        assert!(is_quarter_hour(45));
        assert!(!is_quarter_hour(14));
    }
}
