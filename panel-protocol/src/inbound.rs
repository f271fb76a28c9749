//! Validation of messages pushed in from outside the console

use core::fmt;

use crate::message::{Message, LINE_WIDTH, MAX_SYMBOLS_PER_MESSAGE};

/// Why an inbound message was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundError {
    /// Both lines were empty
    BothEmpty,
    /// A line had more than [`LINE_WIDTH`] characters
    LineTooLong {
        /// 1 or 2
        line: u8,
        /// Character count of the offending line
        len: usize,
    },
    /// The lines use more distinct symbols than there are glyph slots
    TooManySymbols {
        /// Distinct symbols across both lines
        count: usize,
    },
}

impl fmt::Display for InboundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InboundError::BothEmpty => f.write_str("Both lines empty"),
            InboundError::LineTooLong { line, len } => write!(
                f,
                "Max {} char per line (line {} has {})",
                LINE_WIDTH, line, len
            ),
            InboundError::TooManySymbols { count } => write!(
                f,
                "Max {} symbols per msg (got {})",
                MAX_SYMBOLS_PER_MESSAGE, count
            ),
        }
    }
}

/// Check an inbound two-line message and normalise it
///
/// Lengths are counted in characters before normalisation, so a line of
/// sixteen non-ASCII characters is accepted and shown as `?`s. Symbol
/// fallback characters turn into glyphs, so the normalised message must
/// also fit the glyph slots.
pub fn validate_inbound(line_one: &str, line_two: &str) -> Result<Message, InboundError> {
    if line_one.is_empty() && line_two.is_empty() {
        return Err(InboundError::BothEmpty);
    }
    for (line, text) in [(1u8, line_one), (2u8, line_two)] {
        let len = text.chars().count();
        if len > LINE_WIDTH {
            return Err(InboundError::LineTooLong { line, len });
        }
    }
    let message = Message::text(line_one, line_two);
    if !message.fits_glyph_slots() {
        return Err(InboundError::TooManySymbols {
            count: message.distinct_symbols().len(),
        });
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_empty_rejected() {
        assert_eq!(validate_inbound("", ""), Err(InboundError::BothEmpty));
    }

    #[test]
    fn test_long_line_rejected() {
        assert_eq!(
            validate_inbound("ok", "seventeen chars!!"),
            Err(InboundError::LineTooLong { line: 2, len: 17 })
        );
        assert_eq!(
            validate_inbound("seventeen chars!!", ""),
            Err(InboundError::LineTooLong { line: 1, len: 17 })
        );
    }

    #[test]
    fn test_too_many_symbols_rejected() {
        assert_eq!(
            validate_inbound("\\↑↓ᵃᵖ℉●○◂", ""),
            Err(InboundError::TooManySymbols { count: 9 })
        );
        // Spread over both lines still counts once per symbol
        assert_eq!(
            validate_inbound("\\↑↓ᵃᵖ", "℉●○▸"),
            Err(InboundError::TooManySymbols { count: 9 })
        );
        let msg = validate_inbound("\\↑↓ᵃᵖ℉●○", "○●↑").unwrap();
        assert_eq!(msg.distinct_symbols().len(), 8);
    }

    #[test]
    fn test_one_line_is_enough() {
        let msg = validate_inbound("", "hello").unwrap();
        assert!(msg.line_one.is_empty());
        assert_eq!(msg.line_two.len(), 5);
    }

    #[test]
    fn test_exact_width_accepted() {
        assert!(validate_inbound("0123456789abcdef", "0123456789abcdef").is_ok());
    }

    #[test]
    fn test_error_text() {
        assert_eq!(InboundError::BothEmpty.to_string(), "Both lines empty");
        assert_eq!(
            InboundError::TooManySymbols { count: 9 }.to_string(),
            "Max 8 symbols per msg (got 9)"
        );
    }
}
