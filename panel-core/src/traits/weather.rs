//! Weather data source trait

use crate::weather::{WeatherError, WeatherReading};

/// Trait for a current-conditions weather service
///
/// `fetch` may block; the runtime calls it off the controller task.
pub trait WeatherSource {
    /// Fetch the current conditions
    fn fetch(&mut self) -> Result<WeatherReading, WeatherError>;
}
