//! Soil-moisture probe on the ESP32 ADC.
//!
//! # Wiring
//!
//! - AOUT → GPIO34 (ADC1 channel 6)
//! - VCC → 3.3V
//! - GND → GND
//!
//! Note: the probe must sit on ADC1. ADC2 is owned by the Wi-Fi driver
//! while the access point is running and reads fail.

use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::adc::ADC1;
use esp_idf_hal::gpio::Gpio34;
use esp_idf_hal::peripheral::Peripheral;

use crate::traits::AnalogInput;

/// Moisture probe read through a one-shot ADC1 channel.
///
/// Full-scale 11dB attenuation covers the probe's 0-3.3V swing with a
/// 12-bit result (0-4095).
///
/// # Example
///
/// ```ignore
/// use rs_irrigation::hal::esp32::Esp32MoistureSensor;
/// use rs_irrigation::traits::AnalogInput;
///
/// let peripherals = Peripherals::take()?;
/// let mut sensor = Esp32MoistureSensor::new(peripherals.adc1, peripherals.pins.gpio34)?;
/// println!("raw: {}", sensor.read_raw());
/// ```
///
/// A failed read repeats the last good sample. A failure before any good
/// sample reads as `0`.
pub struct Esp32MoistureSensor<'d> {
    channel: AdcChannelDriver<'d, Gpio34, AdcDriver<'d, ADC1>>,
    last_good: Option<u16>,
}

impl<'d> Esp32MoistureSensor<'d> {
    /// Creates the ADC driver and configures the probe channel.
    ///
    /// # Errors
    ///
    /// Returns an error if ADC initialization fails.
    pub fn new(
        adc: impl Peripheral<P = ADC1> + 'd,
        pin: impl Peripheral<P = Gpio34> + 'd,
    ) -> Result<Self, esp_idf_hal::sys::EspError> {
        let driver = AdcDriver::new(adc)?;
        let config = AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        };
        let channel = AdcChannelDriver::new(driver, pin, &config)?;
        Ok(Self {
            channel,
            last_good: None,
        })
    }
}

impl AnalogInput for Esp32MoistureSensor<'_> {
    fn read_raw(&mut self) -> u16 {
        let result = self.channel.read();
        hold_last_good(result, &mut self.last_good)
    }
}

fn hold_last_good<E: core::fmt::Display>(
    result: Result<u16, E>,
    last_good: &mut Option<u16>,
) -> u16 {
    match result {
        Ok(raw) => {
            *last_good = Some(raw);
            raw
        }
        Err(e) => {
            let raw = last_good.unwrap_or(0);
            log::warn!("moisture ADC read failed: {}, using {}", e, raw);
            raw
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_read_repeats_last_good() {
        let mut last = None;
        assert_eq!(hold_last_good::<&str>(Ok(2900), &mut last), 2900);
        assert_eq!(hold_last_good(Err("timeout"), &mut last), 2900);
        assert_eq!(hold_last_good::<&str>(Ok(3100), &mut last), 3100);
        assert_eq!(hold_last_good(Err("timeout"), &mut last), 3100);
    }

    #[test]
    fn failure_before_first_sample_reads_zero() {
        let mut last = None;
        assert_eq!(hold_last_good(Err("timeout"), &mut last), 0);
        assert_eq!(last, None);
    }
}
