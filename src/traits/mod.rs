//! Trait definitions for hardware abstraction, display, and storage.
//!
//! This module defines the core abstractions that allow rs-irrigation to:
//! - Run on different hardware (ESP32, desktop mock)
//! - Drive any text display that can print at a row/column
//! - Persist the threshold wherever the platform keeps settings
//!
//! # Submodules
//!
//! - `hardware`: Moisture ADC, digital outputs, buttons, clock, board bundle
//! - `display`: Character display trait
//! - `storage`: Threshold persistence trait

pub mod display;
pub mod hardware;
pub mod storage;

pub use display::*;
pub use hardware::*;
pub use storage::*;
