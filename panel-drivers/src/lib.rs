//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the console's hardware
//! contracts on top of `embedded-hal` 1.0 pins and delays:
//!
//! - 4x4 matrix keypad scanner producing key edges
//! - HD44780 character LCD in 4-bit mode implementing `DisplayBackend`

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod hd44780;
pub mod keypad;

pub use hd44780::Hd44780;
pub use keypad::{KeypadError, MatrixKeypad};
