//! Menu engine
//!
//! The engine owns the navigation stack, the live button table and the
//! display surface. Everything that changes what the user sees goes through
//! it, from a single task, so a key press is fully handled before the next
//! one is looked at.

pub mod engine;
pub mod numeric;

pub use engine::{MenuEngine, OverlayHandle, MAX_OVERLAYS, MAX_PAGES};
pub use numeric::{NumericEntry, NumericTarget, MAX_DIGITS};
