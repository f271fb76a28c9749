//! Character display abstraction for the Panel console
//!
//! This crate provides:
//! - `DisplayBackend` trait for 16x2 character displays with eight
//!   programmable glyph slots
//! - `GlyphCache`, which maps logical symbols onto those slots
//! - `Surface`, which renders a `Message` through the cache
//! - `MemoryDisplay`, an in-memory backend used by simulators and tests
//!
//! # Architecture
//!
//! The menu engine only ever talks to a `Surface`. The surface owns the
//! backend, so every glyph reprogramming and every line write goes through
//! one place and the cache can never disagree with the hardware.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod glyph_cache;
pub mod memory;
pub mod surface;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError, RawLine};
pub use glyph_cache::GlyphCache;
pub use memory::MemoryDisplay;
pub use surface::Surface;
