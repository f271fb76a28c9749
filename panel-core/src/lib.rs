//! Hardware-agnostic session logic for the Panel console
//!
//! This crate contains everything between the keypad and the display that
//! does not depend on a particular board or operating system:
//!
//! - Frames and their button bindings
//! - The menu engine (navigation stack, overlays, numeric entry, carousel)
//! - The restart policy used to supervise background tasks
//! - The weather page and wall clock formatting
//! - Collaborator traits (monitor control, weather source)
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod config;
pub mod frame;
pub mod menu;
pub mod supervisor;
pub mod traits;
pub mod weather;

pub use frame::{Action, Bindings, Frame, FrameKey};
pub use menu::{MenuEngine, NumericTarget, OverlayHandle};
pub use supervisor::{RestartPolicy, Verdict};
