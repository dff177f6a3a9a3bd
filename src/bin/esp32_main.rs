//! ESP32 DevKit soil-moisture irrigation controller.
//!
//! This is the main entry point for the physical hardware controller.
//! It runs a 100Hz control loop that:
//! - Polls and debounces the menu/increase/decrease buttons
//! - Samples the moisture probe every 500ms
//! - Drives the pump relay and the alarm buzzer
//! - Renders state to the OLED display (if enabled)
//! - Hosts a Wi-Fi access point and the HTTP API (if enabled)
//!
//! # Hardware Setup
//!
//! See [`rs_irrigation::hal::esp32::pins`] for the wiring.
//!
//! # Build
//!
//! ```bash
//! # Basic (sensor + relay + buttons)
//! cargo build --release --features esp32
//!
//! # With display
//! cargo build --release --features esp32,display
//!
//! # Full (display + access point + HTTP)
//! AP_PASSWORD=... cargo build --release --features esp32,display,esp32-http
//!
//! # Probe that reads high when dry
//! SENSOR_POLARITY=inverted SENSOR_RAW_MIN=1200 SENSOR_RAW_MAX=3200 cargo build --release --features esp32
//! ```
//!
//! If NVS cannot be opened the controller still runs; threshold changes
//! just do not survive a reboot.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use esp_idf_hal::gpio::{IOPin, OutputPin, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::log::EspLogger;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use rs_irrigation::hal::esp32::{
    ActiveLowButtons, Esp32Board, Esp32ButtonPin, Esp32Clock, Esp32MoistureSensor, HalOutput,
    NvsThresholdStorage,
};
use rs_irrigation::traits::{Clock, Hardware};
use rs_irrigation::{
    AccessPointConfig, Config, IrrigationController, Polarity, SensorConfig, WebConfig,
};

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    EspLogger::initialize_default();

    log::info!("================================");
    log::info!("  rs-irrigation Controller");
    log::info!("================================");

    // =========================================================================
    // Configuration
    // =========================================================================
    let mut access_point = AccessPointConfig::default();
    if let Some(ssid) = option_env!("AP_SSID") {
        access_point = access_point.with_ssid(ssid);
    }
    if let Some(password) = option_env!("AP_PASSWORD") {
        access_point = access_point.with_password(password);
    }
    let config = Config::default()
        .with_access_point(access_point)
        .with_web(WebConfig::default().with_port(80))
        .with_sensor(sensor_config());
    log::info!(
        "Sensor calibration: raw {}..{} {:?}",
        config.sensor.raw_min,
        config.sensor.raw_max,
        config.sensor.polarity
    );

    let peripherals = Peripherals::take()?;
    let nvs = match EspDefaultNvsPartition::take() {
        Ok(partition) => Some(partition),
        Err(e) => {
            log::warn!("[NVS] Default partition unavailable: {}", e);
            None
        }
    };

    // =========================================================================
    // Initialize Sensor (ADC1 on GPIO34)
    // =========================================================================
    let sensor = Esp32MoistureSensor::new(peripherals.adc1, peripherals.pins.gpio34)?;
    log::info!("[OK] Moisture sensor initialized (GPIO34 ADC1)");

    // =========================================================================
    // Initialize Outputs (relay GPIO13, buzzer GPIO25)
    // =========================================================================
    let relay = HalOutput::new(PinDriver::output(peripherals.pins.gpio13.downgrade_output())?);
    let buzzer = HalOutput::new(PinDriver::output(peripherals.pins.gpio25.downgrade_output())?);
    log::info!("[OK] Relay and buzzer initialized (GPIO13/25)");

    // =========================================================================
    // Initialize Buttons (GPIO32/33/27, pull-up)
    // =========================================================================
    let buttons = ActiveLowButtons::new(
        button(peripherals.pins.gpio32.downgrade())?,
        button(peripherals.pins.gpio33.downgrade())?,
        button(peripherals.pins.gpio27.downgrade())?,
    );
    log::info!("[OK] Buttons initialized (GPIO32/33/27)");

    // =========================================================================
    // Initialize Display (SSD1306 on GPIO21/22) - Optional
    // =========================================================================
    #[cfg(feature = "display")]
    let display = {
        use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
        use esp_idf_hal::prelude::*;
        use rs_irrigation::hal::esp32::Esp32Display;

        let i2c = I2cDriver::new(
            peripherals.i2c0,
            peripherals.pins.gpio21, // SDA
            peripherals.pins.gpio22, // SCL
            &I2cConfig::new().baudrate(400.kHz().into()),
        )?;
        log::info!("[OK] Display bus initialized (GPIO21/22 I2C)");
        Esp32Display::new(i2c)
    };

    #[cfg(not(feature = "display"))]
    let display = rs_irrigation::traits::NullDisplay;

    // =========================================================================
    // Initialize Storage and Controller
    // =========================================================================
    let storage = NvsThresholdStorage::open(nvs.clone());
    if storage.is_available() {
        log::info!("[OK] Threshold storage initialized (NVS)");
    }
    let hw: Hardware<Esp32Board> = Hardware {
        sensor,
        relay,
        buzzer,
        buttons,
        display,
    };

    let clock = Esp32Clock::new();
    let tick = Duration::from_millis(u64::from(config.controller.tick_ms));
    let controller = Arc::new(Mutex::new(IrrigationController::new(hw, storage, &config)));
    controller
        .lock()
        .map_err(|_| anyhow!("controller lock poisoned"))?
        .start(clock.now_ms());

    // =========================================================================
    // Initialize WiFi access point
    // =========================================================================
    #[cfg(feature = "wifi")]
    let _wifi = {
        use esp_idf_svc::eventloop::EspSystemEventLoop;
        use rs_irrigation::hal::esp32::Esp32AccessPoint;

        if config.access_point.enabled {
            let sysloop = EspSystemEventLoop::take()?;
            let ap = Esp32AccessPoint::new(
                peripherals.modem,
                sysloop,
                nvs,
                &config.access_point,
            )?;
            Some(ap)
        } else {
            log::info!("[SKIP] Access point disabled");
            None
        }
    };

    // =========================================================================
    // Initialize HTTP Server (web API + UI)
    // =========================================================================
    #[cfg(feature = "esp32-http")]
    let _server = {
        use rs_irrigation::hal::esp32::Esp32HttpServer;

        if config.web.enabled {
            Some(Esp32HttpServer::new(&config.web, controller.clone(), clock)?)
        } else {
            log::info!("[SKIP] HTTP server disabled");
            None
        }
    };

    log::info!("Starting control loop ({}ms tick)...", config.controller.tick_ms);

    // =========================================================================
    // Main Control Loop
    // =========================================================================
    loop {
        {
            let mut ctl = controller
                .lock()
                .map_err(|_| anyhow!("controller lock poisoned"))?;
            ctl.tick(clock.now_ms());
        }

        // Sleep until next tick (lock released so HTTP handlers can run)
        thread::sleep(tick);
    }
}

/// Sensor calibration from `SENSOR_POLARITY`, `SENSOR_RAW_MIN` and
/// `SENSOR_RAW_MAX` at build time.
fn sensor_config() -> SensorConfig {
    let polarity = option_env!("SENSOR_POLARITY");
    if let Some(text) = polarity {
        if Polarity::from_text(text).is_none() {
            log::warn!("Unknown SENSOR_POLARITY {:?}, keeping default", text);
        }
    }
    SensorConfig::default().with_overrides(
        polarity,
        option_env!("SENSOR_RAW_MIN"),
        option_env!("SENSOR_RAW_MAX"),
    )
}

/// Configures one button pin as a pulled-up input.
fn button(pin: esp_idf_hal::gpio::AnyIOPin) -> anyhow::Result<Esp32ButtonPin> {
    let mut driver = PinDriver::input(pin)?;
    driver.set_pull(Pull::Up)?;
    Ok(driver)
}
