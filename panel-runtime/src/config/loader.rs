//! Configuration loading
//!
//! Reads `panel.toml` from disk. A missing file falls back to the copy
//! embedded at build time; anything else that goes wrong is an error.

use std::fmt;
use std::io;
use std::path::Path;

use tracing::{debug, info, warn};

use panel_core::config::{self as core_config, PanelConfig};

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    /// The file exists but could not be read
    Io(io::Error),
    /// TOML syntax or schema error
    Parse(toml::de::Error),
    /// Values parsed but out of range
    Invalid(core_config::ConfigError),
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<core_config::ConfigError> for ConfigError {
    fn from(e: core_config::ConfigError) -> Self {
        ConfigError::Invalid(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config: {}", e),
            ConfigError::Parse(e) => write!(f, "invalid config: {}", e),
            ConfigError::Invalid(e) => write!(f, "invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse and validate a TOML document
pub fn parse_config(text: &str) -> Result<PanelConfig, ConfigError> {
    let config: PanelConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from `path`, or from `fallback` if the file does not
/// exist
pub fn load_config(path: &Path, fallback: &str) -> Result<PanelConfig, ConfigError> {
    info!("Loading configuration from {}", path.display());

    let config = match std::fs::read_to_string(path) {
        Ok(text) => {
            debug!("Read {} bytes of TOML", text.len());
            parse_config(&text)?
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("{} not found, using embedded defaults", path.display());
            parse_config(fallback)?
        }
        Err(e) => return Err(e.into()),
    };

    log_config_summary(&config);
    Ok(config)
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &PanelConfig) {
    info!("Configuration loaded successfully");
    debug!("  UTC offset {} min", config.clock.utc_offset_minutes);
    debug!(
        "  overlays {} ms, unmapped notice {} ms",
        config.overlay.duration_ms, config.overlay.unmapped_ms
    );
    debug!(
        "  supervisor: {} restarts per {} s",
        config.supervisor.max_restarts, config.supervisor.window_secs
    );
    debug!(
        "  {} monitor inputs{}",
        config.monitor.inputs.len(),
        if config.monitor.dry_run { " (dry run)" } else { "" }
    );
    if config.weather.is_configured() {
        debug!("  weather units {}", config.weather.units.as_str());
    } else {
        warn!("Weather API key or location missing");
    }
}
