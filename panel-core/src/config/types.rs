//! Configuration type definitions
//!
//! Every section has defaults, so an empty file (or no file) yields a
//! working console with the weather page marked misconfigured.

use core::fmt;

use heapless::{String, Vec};

use crate::supervisor::RestartPolicy;
use crate::traits::monitor::MAX_INPUT_LABEL_LEN;
use crate::weather::Units;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum monitor input sources
pub const MAX_INPUTS: usize = 8;

/// Maximum length of a VCP input value such as `0x11`
pub const MAX_INPUT_ID_LEN: usize = 8;

/// Maximum API key length
pub const MAX_API_KEY_LEN: usize = 64;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// UTC offset outside -14h..=+14h
    UtcOffsetOutOfRange,
    /// An overlay duration of zero would never be seen
    ZeroDuration,
    /// Supervisor window of zero seconds
    ZeroWindow,
    /// Latitude or longitude outside their ranges
    LocationOutOfRange,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UtcOffsetOutOfRange => f.write_str("clock.utc_offset_minutes out of range"),
            ConfigError::ZeroDuration => f.write_str("overlay durations must be non-zero"),
            ConfigError::ZeroWindow => f.write_str("supervisor.window_secs must be non-zero"),
            ConfigError::LocationOutOfRange => {
                f.write_str("weather.latitude/longitude out of range")
            }
        }
    }
}

/// Wall clock configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClockConfig {
    /// Fixed offset from UTC in minutes (no daylight saving)
    pub utc_offset_minutes: i16,
}

/// Overlay timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverlayConfig {
    /// How long ephemeral messages stay up
    pub duration_ms: u32,
    /// How long the "unmapped" notice stays up
    pub unmapped_ms: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            duration_ms: 5000,
            unmapped_ms: 500,
        }
    }
}

/// Restart limits for supervised tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SupervisorConfig {
    /// Restarts allowed inside one window
    pub max_restarts: u8,
    /// Window length in seconds
    pub window_secs: u32,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            max_restarts: 3,
            window_secs: 30,
        }
    }
}

impl SupervisorConfig {
    /// Fresh policy with these limits
    pub fn policy(&self) -> RestartPolicy {
        RestartPolicy::new(self.max_restarts, u64::from(self.window_secs) * 1000)
    }
}

/// One selectable monitor input
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonitorInput {
    /// VCP 0x60 value, e.g. `0x11`
    pub id: String<MAX_INPUT_ID_LEN>,
    /// Shown after `DISPLAY:`
    pub label: String<MAX_INPUT_LABEL_LEN>,
}

/// Monitor control configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonitorConfig {
    /// Log commands instead of running them
    pub dry_run: bool,
    /// ddcutil display number, if more than one monitor is attached
    pub display: Option<u8>,
    /// Input sources in cycling order
    pub inputs: Vec<MonitorInput, MAX_INPUTS>,
}

/// Weather service configuration
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeatherConfig {
    pub api_key: Option<String<MAX_API_KEY_LEN>>,
    pub latitude: Option<f32>,
    pub longitude: Option<f32>,
    pub units: Units,
}

impl WeatherConfig {
    /// Whether key and location are all present
    pub fn is_configured(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
            && self.latitude.is_some()
            && self.longitude.is_some()
    }
}

/// Complete console configuration
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PanelConfig {
    pub clock: ClockConfig,
    pub overlay: OverlayConfig,
    pub supervisor: SupervisorConfig,
    pub monitor: MonitorConfig,
    pub weather: WeatherConfig,
}

impl PanelConfig {
    /// Check value ranges that the type system does not
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-14 * 60..=14 * 60).contains(&self.clock.utc_offset_minutes) {
            return Err(ConfigError::UtcOffsetOutOfRange);
        }
        if self.overlay.duration_ms == 0 || self.overlay.unmapped_ms == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if self.supervisor.window_secs == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        let lat_ok = self.weather.latitude.map_or(true, |l| (-90.0..=90.0).contains(&l));
        let lon_ok = self
            .weather
            .longitude
            .map_or(true, |l| (-180.0..=180.0).contains(&l));
        if !lat_ok || !lon_ok {
            return Err(ConfigError::LocationOutOfRange);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PanelConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.overlay.duration_ms, 5000);
        assert_eq!(config.overlay.unmapped_ms, 500);
        assert!(!config.weather.is_configured());
    }

    #[test]
    fn test_policy_from_config() {
        let policy = SupervisorConfig::default().policy();
        assert_eq!(policy.max_restarts(), 3);
        assert_eq!(policy.window_ms(), 30_000);
    }

    #[test]
    fn test_offset_range() {
        let mut config = PanelConfig::default();
        config.clock.utc_offset_minutes = 15 * 60;
        assert_eq!(config.validate(), Err(ConfigError::UtcOffsetOutOfRange));
    }

    #[test]
    fn test_location_range() {
        let mut config = PanelConfig::default();
        config.weather.latitude = Some(91.0);
        assert_eq!(config.validate(), Err(ConfigError::LocationOutOfRange));
    }

    #[test]
    fn test_weather_configured() {
        let mut weather = WeatherConfig::default();
        weather.api_key = Some(String::try_from("abc").unwrap());
        weather.latitude = Some(40.0);
        assert!(!weather.is_configured());
        weather.longitude = Some(-75.0);
        assert!(weather.is_configured());
    }
}
