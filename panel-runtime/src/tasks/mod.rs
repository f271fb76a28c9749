//! Embassy async tasks
//!
//! The controller owns the menu engine. The keypad, tick and weather tasks
//! are each wrapped by `supervise` and resolve to an `Exit` when they stop
//! for good. `main` races them all, so the first to stop ends the run and
//! drops (cancels) the rest.

pub mod controller;
pub mod keypad;
pub mod supervisor;
pub mod tick;
pub mod weather;

use std::time::{SystemTime, UNIX_EPOCH};

pub use controller::controller_task;
pub use keypad::keypad_task;
pub use supervisor::{supervise, TaskError};
pub use tick::tick_task;
pub use weather::{weather_task, FetchWorker};

/// Why the runtime is stopping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Orderly shutdown requested from the console
    Requested,
    /// The named supervised task exceeded its restart budget
    Fatal(&'static str),
}

/// Wall clock in unix seconds
pub fn unix_now() -> Result<i64, TaskError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|_| TaskError::Clock)
}
