//! Configuration types
//!
//! Hardware-agnostic configuration structures. The runtime deserialises them
//! from `panel.toml` with the `serde` feature enabled.

pub mod types;

pub use types::*;
