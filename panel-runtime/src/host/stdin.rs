//! Console keypad
//!
//! Reads stdin on a plain thread and forwards parsed lines to the keypad
//! task. Line syntax:
//! - `2`, `#`, `12#`: press and release each key in turn
//! - `say first line|second line`: post an inbound message
//! - `quit` (or end of input): shut down

use std::io::{self, BufRead};
use std::thread;
use std::time::Duration;

use embassy_sync::channel::TrySendError;
use tracing::{debug, warn};

use panel_protocol::ButtonLabel;

use crate::channels::{Channels, ConsoleInput};

/// Back-off while the console channel is full
const FULL_RETRY: Duration = Duration::from_millis(10);

/// Why a console line was not understood
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Blank line
    Empty,
    /// A character that is not a key label
    UnknownKey(char),
    /// More keys than one line may carry
    TooManyKeys,
}

/// Parse one console line
pub fn parse_line(line: &str) -> Result<ConsoleInput, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }
    if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
        return Ok(ConsoleInput::Quit);
    }
    if let Some(text) = line.strip_prefix("say ") {
        let (line_one, line_two) = text.split_once('|').unwrap_or((text, ""));
        return Ok(ConsoleInput::Post {
            line_one: line_one.to_string(),
            line_two: line_two.to_string(),
        });
    }

    let mut keys = heapless::Vec::new();
    for c in line.chars().filter(|c| !c.is_whitespace()) {
        let label = ButtonLabel::from_char(c).ok_or(ParseError::UnknownKey(c))?;
        keys.push(label).map_err(|_| ParseError::TooManyKeys)?;
    }
    Ok(ConsoleInput::Keys(keys))
}

/// Start the reader thread
pub fn spawn_reader(channels: &'static Channels) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || read_lines(io::stdin().lock(), channels))
}

fn read_lines(input: impl BufRead, channels: &'static Channels) {
    for line in input.lines() {
        let parsed = match line {
            Ok(line) => match parse_line(&line) {
                Ok(parsed) => parsed,
                Err(ParseError::Empty) => continue,
                Err(e) => {
                    warn!("ignoring console line {:?}: {:?}", line, e);
                    continue;
                }
            },
            Err(e) => {
                warn!("stdin read failed: {}", e);
                ConsoleInput::ReadFailed
            }
        };
        let quit = parsed == ConsoleInput::Quit;
        forward(channels, parsed);
        if quit {
            return;
        }
    }
    debug!("stdin closed");
    forward(channels, ConsoleInput::Quit);
}

fn forward(channels: &Channels, mut input: ConsoleInput) {
    loop {
        match channels.console.try_send(input) {
            Ok(()) => return,
            Err(TrySendError::Full(back)) => {
                input = back;
                thread::sleep(FULL_RETRY);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_cell::StaticCell;

    fn keys(labels: &[ButtonLabel]) -> ConsoleInput {
        ConsoleInput::Keys(heapless::Vec::from_slice(labels).unwrap())
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(parse_line("2").unwrap(), keys(&[ButtonLabel::TWO]));
        assert_eq!(
            parse_line(" 1 5 0#\n").unwrap(),
            keys(&[
                ButtonLabel::ONE,
                ButtonLabel::FIVE,
                ButtonLabel::ZERO,
                ButtonLabel::HASH
            ])
        );
        assert_eq!(parse_line("a").unwrap(), keys(&[ButtonLabel::A]));
    }

    #[test]
    fn test_parse_say() {
        assert_eq!(
            parse_line("say Hello|World").unwrap(),
            ConsoleInput::Post {
                line_one: "Hello".into(),
                line_two: "World".into()
            }
        );
        assert_eq!(
            parse_line("say one line").unwrap(),
            ConsoleInput::Post {
                line_one: "one line".into(),
                line_two: String::new()
            }
        );
    }

    #[test]
    fn test_parse_quit_and_errors() {
        assert_eq!(parse_line("QUIT").unwrap(), ConsoleInput::Quit);
        assert_eq!(parse_line("   "), Err(ParseError::Empty));
        assert_eq!(parse_line("12x"), Err(ParseError::UnknownKey('x')));
        assert_eq!(parse_line(&"1".repeat(17)), Err(ParseError::TooManyKeys));
    }

    #[test]
    fn test_reader_forwards_then_quits_on_eof() {
        static CHANNELS: StaticCell<Channels> = StaticCell::new();
        let channels: &'static Channels = CHANNELS.init(Channels::new());
        read_lines("5\nbogus!\n\nsay a|b\n".as_bytes(), channels);

        assert_eq!(channels.console.try_receive().unwrap(), keys(&[ButtonLabel::FIVE]));
        assert!(matches!(
            channels.console.try_receive().unwrap(),
            ConsoleInput::Post { .. }
        ));
        assert_eq!(channels.console.try_receive().unwrap(), ConsoleInput::Quit);
        assert!(channels.console.try_receive().is_err());
    }
}
