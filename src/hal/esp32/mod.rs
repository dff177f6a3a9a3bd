//! ESP32 DevKit hardware abstraction layer for the irrigation controller.
//!
//! This module provides hardware implementations for a classic ESP32
//! (dual-core Xtensa) DevKit board wired to a capacitive soil-moisture probe,
//! a pump relay module, a piezo buzzer, and three push buttons.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-WROOM-32 DevKit
//! - **Sensor**: Capacitive soil-moisture probe (analog out, ADC1)
//! - **Actuators**: 5V relay module (pump), active piezo buzzer
//! - **Input**: Menu, increase, decrease buttons (to GND, internal pull-ups)
//! - **Display**: SSD1306 128x64 OLED (I2C) driven as a 16x2 text grid
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments.

mod clock;
mod gpio;
mod sensor;
mod storage;

pub use clock::Esp32Clock;
pub use gpio::{ActiveLowButtons, HalOutput};
pub use sensor::Esp32MoistureSensor;
pub use storage::{NvsThresholdStorage, StorageError, NVS_NAMESPACE, NVS_THRESHOLD_KEY};

#[cfg(feature = "display")]
mod display;
#[cfg(feature = "display")]
pub use display::{DisplayError, Esp32Display};

#[cfg(feature = "wifi")]
mod wifi;
#[cfg(feature = "wifi")]
pub use wifi::Esp32AccessPoint;

#[cfg(feature = "esp32-http")]
mod http;
#[cfg(feature = "esp32-http")]
pub use http::{Esp32HttpServer, SharedEspController};

use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Input, Output, PinDriver};

use crate::traits::Board;

/// Relay or buzzer output pin.
pub type Esp32Output = HalOutput<PinDriver<'static, AnyOutputPin, Output>>;

/// Button input pin.
pub type Esp32ButtonPin = PinDriver<'static, AnyIOPin, Input>;

/// The three buttons.
pub type Esp32Buttons = ActiveLowButtons<Esp32ButtonPin, Esp32ButtonPin, Esp32ButtonPin>;

/// The DevKit board wiring described in [`pins`].
pub struct Esp32Board;

impl Board for Esp32Board {
    type Sensor = Esp32MoistureSensor<'static>;
    type Output = Esp32Output;
    type Buttons = Esp32Buttons;
    #[cfg(feature = "display")]
    type Display = Esp32Display<'static>;
    #[cfg(not(feature = "display"))]
    type Display = crate::traits::NullDisplay;
}

/// Pin assignments for the ESP32 DevKit.
///
/// - Moisture probe on an ADC1 pin (ADC2 is unusable while Wi-Fi is on)
/// - Relay and buzzer on output-capable GPIOs
/// - Buttons on GPIOs with internal pull-ups (GPIO34-39 have none)
/// - I2C display on the default I2C pins
pub mod pins {
    // =========================================================================
    // Sensor
    // =========================================================================

    /// Soil-moisture analog input (ADC1 channel 6)
    pub const MOISTURE: i32 = 34;

    // =========================================================================
    // Actuators
    // =========================================================================

    /// Pump relay (active high)
    pub const RELAY: i32 = 13;

    /// Alarm buzzer (active high)
    pub const BUZZER: i32 = 25;

    // =========================================================================
    // Buttons (active low, internal pull-up)
    // =========================================================================

    /// Menu button
    pub const MENU_BUTTON: i32 = 32;

    /// Increase button
    pub const PLUS_BUTTON: i32 = 33;

    /// Decrease button
    pub const MINUS_BUTTON: i32 = 27;

    // =========================================================================
    // I2C Display (SSD1306)
    // =========================================================================

    /// I2C data line
    pub const I2C_SDA: i32 = 21;

    /// I2C clock line
    pub const I2C_SCL: i32 = 22;

    /// Default I2C address for SSD1306 OLED
    pub const OLED_I2C_ADDR: u8 = 0x3C;
}
