//! Monitor control trait
//!
//! The console adjusts the attached monitor over DDC/CI: speaker volume,
//! backlight brightness and the active input source.

use core::fmt;

use heapless::String;

/// Maximum input label length
pub const MAX_INPUT_LABEL_LEN: usize = 16;

/// Human readable input source name
pub type InputLabel = String<MAX_INPUT_LABEL_LEN>;

/// Direction to cycle the input source list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStep {
    Previous,
    Next,
}

impl InputStep {
    /// Index after stepping through a list of `len` entries, wrapping
    pub fn apply(self, current: usize, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        match self {
            InputStep::Previous => (current + len - 1) % len,
            InputStep::Next => (current + 1) % len,
        }
    }
}

/// Errors that can occur with monitor operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorError {
    /// The control command could not be run or reported failure
    CommandFailed,
    /// No input sources are configured
    NoInputs,
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::CommandFailed => f.write_str("monitor command failed"),
            MonitorError::NoInputs => f.write_str("no monitor inputs configured"),
        }
    }
}

/// Trait for the monitor being controlled
///
/// Values are percentages; implementations clamp to 0..=100 before sending.
pub trait Monitor {
    /// Set the speaker volume
    fn set_volume(&mut self, percent: u8) -> Result<(), MonitorError>;

    /// Set the backlight brightness
    fn set_brightness(&mut self, percent: u8) -> Result<(), MonitorError>;

    /// Switch to the previous or next input source, returning its label
    fn cycle_input(&mut self, step: InputStep) -> Result<InputLabel, MonitorError>;
}
