//! Inter-task communication channels
//!
//! One `Channels` bundle is created at start-up and handed to every task by
//! reference. Only the controller task touches the menu engine; everything
//! else talks to it through `commands`.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use panel_core::weather::{RefreshReason, WeatherError, WeatherReading};
use panel_protocol::{ButtonLabel, KeyEvent};

/// Channel capacity for controller commands
const COMMAND_CHANNEL_SIZE: usize = 16;

/// Channel capacity for parsed console lines
const CONSOLE_CHANNEL_SIZE: usize = 8;

/// Most keys accepted from one console line
pub const MAX_KEYS_PER_LINE: usize = 16;

/// Work for the controller task
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Key edge from the keypad
    Key(KeyEvent),
    /// Inbound message, not yet validated
    Post { line_one: String, line_two: String },
    /// Wall clock crossed a minute boundary (unix seconds)
    Minute(i64),
    /// Outcome of a weather fetch
    Weather(Result<WeatherReading, WeatherError>),
}

/// One line typed on the console, already parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// Press and release these keys in order
    Keys(heapless::Vec<ButtonLabel, MAX_KEYS_PER_LINE>),
    /// `say line one|line two`
    Post { line_one: String, line_two: String },
    /// `quit` or end of input
    Quit,
    /// Reading stdin failed
    ReadFailed,
}

/// Everything the tasks share
pub struct Channels {
    /// Commands for the controller
    pub commands: Channel<CriticalSectionRawMutex, Command, COMMAND_CHANNEL_SIZE>,

    /// Lines from the stdin reader thread
    pub console: Channel<CriticalSectionRawMutex, ConsoleInput, CONSOLE_CHANNEL_SIZE>,

    /// The weather page wants fresh data
    pub weather_refresh: Signal<CriticalSectionRawMutex, RefreshReason>,

    /// A fetch finished on the worker thread
    pub weather_done: Signal<CriticalSectionRawMutex, Result<WeatherReading, WeatherError>>,
}

impl Channels {
    pub const fn new() -> Self {
        Self {
            commands: Channel::new(),
            console: Channel::new(),
            weather_refresh: Signal::new(),
            weather_done: Signal::new(),
        }
    }
}

impl Default for Channels {
    fn default() -> Self {
        Self::new()
    }
}
