//! Configuration loading and parsing
//!
//! Loads `panel.toml` with `serde` + `toml`, falling back to the copy
//! embedded in the binary.

pub mod loader;

pub use loader::{load_config, parse_config, ConfigError};
