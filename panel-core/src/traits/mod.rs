//! Collaborator traits
//!
//! These traits define the interface between the session logic and the
//! outside world: the monitor being controlled and the weather service.

pub mod monitor;
pub mod weather;

pub use monitor::{InputLabel, InputStep, Monitor, MonitorError};
pub use weather::WeatherSource;
