//! Hardware abstraction traits for the sensor, outputs, buttons, and clock.
//!
//! This module defines the hardware interfaces that let the irrigation core
//! run unchanged on the ESP32 and on a desktop with mocks.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`AnalogInput`] | Raw soil-moisture ADC sample |
//! | [`DigitalOutput`] | Relay (pump) and buzzer drive |
//! | [`ButtonInput`] | Menu / increase / decrease buttons |
//! | [`Clock`] | Monotonic millisecond time source |
//! | [`Board`] | Bundles the concrete types for one platform |
//!
//! # Example
//!
//! ```rust
//! use rs_irrigation::traits::{AnalogInput, DigitalOutput};
//! use rs_irrigation::hal::{MockPin, MockSensor};
//!
//! let mut sensor = MockSensor::new(2048);
//! assert_eq!(sensor.read_raw(), 2048);
//!
//! let mut relay = MockPin::new();
//! relay.set_level(true).unwrap();
//! assert!(relay.level);
//! ```

use super::display::CharDisplay;

/// Raw analog input, typically a 12-bit ADC channel.
///
/// Reads are trusted: implementations that can fail should map the failure
/// to a value rather than surface an error. The ESP32 adapter repeats the
/// last good sample.
pub trait AnalogInput {
    /// Reads one raw sample.
    fn read_raw(&mut self) -> u16;
}

/// A single digital output pin.
///
/// `true` drives the pin high (relay energised, buzzer sounding).
pub trait DigitalOutput {
    /// Error type for output operations.
    type Error: core::fmt::Debug;

    /// Drives the output to the given level.
    fn set_level(&mut self, high: bool) -> Result<(), Self::Error>;
}

/// Levels of the three control buttons.
///
/// `true` means the button is currently held down. Hardware adapters are
/// responsible for converting the active-low pull-up wiring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonLevels {
    /// Menu (enter/leave threshold editing).
    pub menu: bool,
    /// Increase threshold.
    pub increase: bool,
    /// Decrease threshold.
    pub decrease: bool,
}

impl ButtonLevels {
    /// All buttons released.
    pub const RELEASED: Self = Self {
        menu: false,
        increase: false,
        decrease: false,
    };

    /// Converts raw active-low pin readings (`true` = pin high) to levels.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_irrigation::traits::ButtonLevels;
    ///
    /// let levels = ButtonLevels::from_active_low(false, true, true);
    /// assert!(levels.menu);
    /// assert!(!levels.increase);
    /// ```
    #[inline]
    pub const fn from_active_low(menu_high: bool, increase_high: bool, decrease_high: bool) -> Self {
        Self {
            menu: !menu_high,
            increase: !increase_high,
            decrease: !decrease_high,
        }
    }
}

/// The three physical buttons, sampled together.
pub trait ButtonInput {
    /// Returns the current raw (undebounced) button levels.
    fn read_levels(&mut self) -> ButtonLevels;
}

/// Time source trait for `no_std` compatibility.
///
/// # Example
///
/// ```rust
/// use rs_irrigation::traits::Clock;
/// use rs_irrigation::hal::MockClock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}

/// The set of concrete hardware types for one platform.
///
/// Relay and buzzer share the [`Output`](Board::Output) type.
pub trait Board {
    /// Soil-moisture ADC channel.
    type Sensor: AnalogInput;
    /// Relay and buzzer pins.
    type Output: DigitalOutput;
    /// The three buttons.
    type Buttons: ButtonInput;
    /// Character display.
    type Display: CharDisplay;
}

/// Owned peripherals for one [`Board`].
pub struct Hardware<B: Board> {
    /// Moisture sensor input.
    pub sensor: B::Sensor,
    /// Pump relay output.
    pub relay: B::Output,
    /// Alarm buzzer output.
    pub buzzer: B::Output,
    /// Button inputs.
    pub buttons: B::Buttons,
    /// Status display.
    pub display: B::Display,
}
