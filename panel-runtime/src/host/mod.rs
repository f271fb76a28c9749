//! Host-side backends
//!
//! Stand-ins for the panel hardware when running on a desktop or an SBC
//! without the LCD wired up:
//! - `terminal`: draws the 16x2 display on stdout
//! - `stdin`: typed lines become key presses and inbound messages
//! - `ddc`: monitor control through `ddcutil`
//! - `openweather`: current conditions over HTTPS

pub mod ddc;
pub mod openweather;
pub mod stdin;
pub mod terminal;

pub use ddc::DdcutilMonitor;
pub use openweather::OpenWeather;
pub use terminal::TerminalDisplay;
