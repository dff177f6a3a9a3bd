//! SSD1306 OLED driven as a 16x2 character display.
//!
//! An 8-pixel-wide font gives exactly 16 columns across the 128-pixel
//! panel; the two text rows sit centred vertically.
//!
//! # Wiring
//!
//! - SDA → GPIO21
//! - SCL → GPIO22
//! - VCC → 3.3V
//! - GND → GND

use embedded_graphics::{
    mono_font::{ascii::FONT_8X13, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use esp_idf_hal::i2c::I2cDriver;
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306};

use crate::traits::{CharDisplay, DISPLAY_COLS, DISPLAY_ROWS};

/// SSD1306 display type alias for cleaner code.
type DisplayDriver<'d> = Ssd1306<
    I2CInterface<I2cDriver<'d>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

const CHAR_W: i32 = 8;
const CHAR_H: u32 = 13;
/// Top edge of each text row.
const ROW_Y: [i32; DISPLAY_ROWS as usize] = [14, 38];

/// SSD1306 OLED character display for ESP32.
///
/// # Display Layout
///
/// ```text
/// ┌────────────────────────────┐
/// │                            │
/// │ Moisture: 37%              │  row 0
/// │                            │
/// │ Status: Irrigate           │  row 1
/// │                            │
/// └────────────────────────────┘
/// ```
///
/// Writes go to the frame buffer; [`flush`](CharDisplay::flush) sends it.
pub struct Esp32Display<'d> {
    display: DisplayDriver<'d>,
}

impl<'d> Esp32Display<'d> {
    /// Creates a new display instance on an I2C bus.
    pub fn new(i2c: I2cDriver<'d>) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        let display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        Self { display }
    }
}

impl CharDisplay for Esp32Display<'_> {
    type Error = DisplayError;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.display.init()?;
        self.clear()
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.display.clear(BinaryColor::Off)?;
        self.display.flush()?;
        Ok(())
    }

    fn write_at(&mut self, row: u8, col: u8, text: &str) -> Result<(), Self::Error> {
        let Some(&y) = ROW_Y.get(usize::from(row)) else {
            return Ok(());
        };
        let room = usize::from(DISPLAY_COLS.saturating_sub(col));
        let end = text
            .char_indices()
            .nth(room)
            .map(|(i, _)| i)
            .unwrap_or(text.len());
        let text = &text[..end];
        let width = text.chars().count() as u32 * CHAR_W as u32;
        let origin = Point::new(i32::from(col) * CHAR_W, y);

        // Blank the cells first so shorter text does not leave stale pixels
        Rectangle::new(origin, Size::new(width, CHAR_H))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(&mut self.display)?;

        let style = MonoTextStyle::new(&FONT_8X13, BinaryColor::On);
        Text::with_baseline(text, origin, style, Baseline::Top).draw(&mut self.display)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.display.flush()?;
        Ok(())
    }
}

/// Display error type.
#[derive(Debug)]
pub struct DisplayError;

impl From<display_interface::DisplayError> for DisplayError {
    fn from(_: display_interface::DisplayError) -> Self {
        DisplayError
    }
}
