//! Character display abstraction.
//!
//! This module defines the [`CharDisplay`] trait for the 2×16 status display.
//! The core only ever writes whole rows through [`CharDisplay::write_at`],
//! so any text-capable device (HD44780 LCD, OLED rendering a character grid,
//! a test double) can sit behind it.

/// Number of text rows on the display.
pub const DISPLAY_ROWS: u8 = 2;

/// Number of text columns on the display.
pub const DISPLAY_COLS: u8 = 16;

/// Display trait for positioned text output.
///
/// # Example
///
/// ```ignore
/// use rs_irrigation::traits::CharDisplay;
///
/// struct MyLcd { /* ... */ }
///
/// impl CharDisplay for MyLcd {
///     type Error = ();
///
///     fn init(&mut self) -> Result<(), ()> { Ok(()) }
///     fn clear(&mut self) -> Result<(), ()> { Ok(()) }
///     fn write_at(&mut self, row: u8, col: u8, text: &str) -> Result<(), ()> {
///         // set cursor, print
///         Ok(())
///     }
/// }
/// ```
pub trait CharDisplay {
    /// Error type for display operations.
    type Error: core::fmt::Debug;

    /// Initializes the display hardware.
    ///
    /// Called once at startup.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Clears every cell.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Writes `text` starting at (`row`, `col`).
    ///
    /// Text past the last column is dropped.
    fn write_at(&mut self, row: u8, col: u8, text: &str) -> Result<(), Self::Error>;

    /// Pushes buffered writes to the device.
    ///
    /// Unbuffered displays can keep the default no-op.
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Display that discards everything, for boards built without a screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl CharDisplay for NullDisplay {
    type Error = core::convert::Infallible;

    fn init(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn write_at(&mut self, _row: u8, _col: u8, _text: &str) -> Result<(), Self::Error> {
        Ok(())
    }
}
