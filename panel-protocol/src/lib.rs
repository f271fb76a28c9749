//! Panel console shared types
//!
//! This crate defines the values exchanged between the input driver, the
//! menu engine and the character display. It has no knowledge of hardware.
//!
//! # Display model
//!
//! The display is a fixed grid of two lines with sixteen render units each:
//! ```text
//! ┌────────────────┐
//! │Main Menu     2↑│
//! │              8↓│
//! └────────────────┘
//! ```
//!
//! A render unit is either a printable ASCII byte or a logical [`Symbol`]
//! that occupies one of the eight programmable glyph slots at render time.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod events;
pub mod inbound;
pub mod message;
pub mod symbols;

pub use events::{ButtonLabel, KeyEvent, BUTTON_COUNT};
pub use inbound::{validate_inbound, InboundError};
pub use message::{Align, Cell, Line, Message, LINE_WIDTH, MAX_SYMBOLS_PER_MESSAGE};
pub use symbols::{Bitmap, Symbol, GLYPH_SLOTS, SYMBOL_COUNT};
