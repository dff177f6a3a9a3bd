//! Digital I/O adapters over `embedded-hal` 1.0 pins.
//!
//! `PinDriver` implements the `embedded-hal` digital traits, so these
//! adapters are written against the traits rather than the ESP-IDF types.
//!
//! # Wiring
//!
//! - Relay IN → GPIO13, buzzer + → GPIO25 (both active high)
//! - Each button between its GPIO and GND; internal pull-ups enabled, so a
//!   pressed button reads low

use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::traits::{ButtonInput, ButtonLevels, DigitalOutput};

/// Active-high digital output.
///
/// # Example
///
/// ```ignore
/// use esp_idf_hal::gpio::{OutputPin, PinDriver};
/// use rs_irrigation::hal::esp32::HalOutput;
///
/// let relay = HalOutput::new(PinDriver::output(peripherals.pins.gpio13.downgrade_output())?);
/// ```
pub struct HalOutput<P> {
    pin: P,
}

impl<P: OutputPin> HalOutput<P> {
    /// Wraps a configured output pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> DigitalOutput for HalOutput<P> {
    type Error = P::Error;

    fn set_level(&mut self, high: bool) -> Result<(), Self::Error> {
        self.pin.set_state(PinState::from(high))
    }
}

/// Three pull-up buttons that read low while pressed.
///
/// A pin read error counts as "released" for that sample.
pub struct ActiveLowButtons<M, I, D> {
    menu: M,
    increase: I,
    decrease: D,
}

impl<M: InputPin, I: InputPin, D: InputPin> ActiveLowButtons<M, I, D> {
    /// Wraps three input pins already configured with pull-ups.
    pub fn new(menu: M, increase: I, decrease: D) -> Self {
        Self {
            menu,
            increase,
            decrease,
        }
    }
}

fn is_high<P: InputPin>(pin: &mut P) -> bool {
    pin.is_high().unwrap_or(true)
}

impl<M: InputPin, I: InputPin, D: InputPin> ButtonInput for ActiveLowButtons<M, I, D> {
    fn read_levels(&mut self) -> ButtonLevels {
        ButtonLevels::from_active_low(
            is_high(&mut self.menu),
            is_high(&mut self.increase),
            is_high(&mut self.decrease),
        )
    }
}
