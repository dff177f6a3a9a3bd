//! Shared configuration system for desktop and ESP32.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! # Example
//!
//! ```rust
//! use rs_irrigation::config::{AccessPointConfig, Config, ControllerConfig, WebConfig};
//!
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.controller.default_threshold, 40);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_access_point(AccessPointConfig::default().with_ssid("Greenhouse"))
//!     .with_web(WebConfig::default().with_port(8080))
//!     .with_controller(ControllerConfig::default().with_sample_interval_ms(1000));
//! ```

use heapless::String as HString;

use crate::sensor::{Calibration, Polarity};

/// Maximum length for short config strings (SSIDs, passwords, names)
pub const MAX_SHORT_STRING: usize = 64;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

// ============================================================================
// Helper for creating heapless strings
// ============================================================================

/// Create a ShortString from a &str, truncating at a char boundary if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    for c in s.chars() {
        if hs.push(c).is_err() {
            break;
        }
    }
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Wi-Fi access point configuration
    pub access_point: AccessPointConfig,
    /// Web server configuration
    pub web: WebConfig,
    /// Control loop timing and defaults
    pub controller: ControllerConfig,
    /// Moisture sensor calibration
    pub sensor: SensorConfig,
    /// Device identification
    pub device: DeviceConfig,
}

impl Config {
    /// Set access point configuration
    pub fn with_access_point(mut self, access_point: AccessPointConfig) -> Self {
        self.access_point = access_point;
        self
    }

    /// Set web configuration
    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }

    /// Set controller configuration
    pub fn with_controller(mut self, controller: ControllerConfig) -> Self {
        self.controller = controller;
        self
    }

    /// Set sensor configuration
    pub fn with_sensor(mut self, sensor: SensorConfig) -> Self {
        self.sensor = sensor;
        self
    }

    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }
}

// ============================================================================
// Access Point Config
// ============================================================================

/// Wi-Fi access point configuration
///
/// The device hosts its own network; clients join it and browse to the
/// gateway address.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessPointConfig {
    /// Network SSID
    pub ssid: ShortString,
    /// WPA2 password (empty = open network)
    pub password: ShortString,
    /// Radio channel (1-13)
    pub channel: u8,
    /// Maximum simultaneous clients
    pub max_connections: u16,
    /// Whether the access point is enabled
    pub enabled: bool,
}

impl Default for AccessPointConfig {
    fn default() -> Self {
        Self {
            ssid: short_string("SmartIrrigation"),
            password: short_string("IrrigationSystem2024!"),
            channel: 1,
            max_connections: 4,
            enabled: true,
        }
    }
}

impl AccessPointConfig {
    /// Set the SSID
    pub fn with_ssid(mut self, ssid: &str) -> Self {
        self.ssid = short_string(ssid);
        self
    }

    /// Set the password
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = short_string(password);
        self
    }

    /// Set the radio channel, clamped to 1-13
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel.clamp(1, 13);
        self
    }

    /// Set the client limit
    pub fn with_max_connections(mut self, max: u16) -> Self {
        self.max_connections = max;
        self
    }

    /// Enable or disable the access point
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// True when no password is set
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

// ============================================================================
// Web Config
// ============================================================================

/// Web server configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebConfig {
    /// Port to listen on
    pub port: u16,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
    /// Whether web server is enabled
    pub enabled: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 80,
            cors_permissive: true,
            enabled: true,
        }
    }
}

impl WebConfig {
    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS mode
    pub fn with_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Enable or disable web server
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

// ============================================================================
// Controller Config
// ============================================================================

/// Control loop timing and defaults
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerConfig {
    /// Loop period; buttons are polled every tick
    pub tick_ms: u32,
    /// Sensor sampling and actuation period
    pub sample_interval_ms: u32,
    /// Button debounce window
    pub debounce_ms: u32,
    /// Auto-repeat interval for held +/- buttons
    pub repeat_ms: u32,
    /// Lifetime of the mode-change banner
    pub banner_ms: u32,
    /// Lifetime of the start-up splash
    pub splash_ms: u32,
    /// Threshold used when nothing is stored
    pub default_threshold: u8,
    /// WiFi mode: warn after this long without a status poll (0 = never)
    pub remote_stale_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tick_ms: 10,
            sample_interval_ms: 500,
            debounce_ms: 50,
            repeat_ms: 200,
            banner_ms: 1500,
            splash_ms: 2000,
            default_threshold: 40,
            remote_stale_ms: 30_000,
        }
    }
}

impl ControllerConfig {
    /// Set the loop period (minimum 1ms)
    pub fn with_tick_ms(mut self, ms: u32) -> Self {
        self.tick_ms = ms.max(1);
        self
    }

    /// Set the sampling interval
    pub fn with_sample_interval_ms(mut self, ms: u32) -> Self {
        self.sample_interval_ms = ms;
        self
    }

    /// Set the debounce window
    pub fn with_debounce_ms(mut self, ms: u32) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Set the auto-repeat interval
    pub fn with_repeat_ms(mut self, ms: u32) -> Self {
        self.repeat_ms = ms;
        self
    }

    /// Set the mode banner lifetime
    pub fn with_banner_ms(mut self, ms: u32) -> Self {
        self.banner_ms = ms;
        self
    }

    /// Set the splash lifetime (0 = no splash)
    pub fn with_splash_ms(mut self, ms: u32) -> Self {
        self.splash_ms = ms;
        self
    }

    /// Set the default threshold, clamped to 100
    pub fn with_default_threshold(mut self, percent: u8) -> Self {
        self.default_threshold = percent.min(100);
        self
    }

    /// Set the remote staleness limit
    pub fn with_remote_stale_ms(mut self, ms: u32) -> Self {
        self.remote_stale_ms = ms;
        self
    }
}

// ============================================================================
// Sensor Config
// ============================================================================

/// Moisture sensor calibration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorConfig {
    /// Raw reading mapped to one end of the scale
    pub raw_min: u16,
    /// Raw reading mapped to the other end
    pub raw_max: u16,
    /// Mapping direction
    pub polarity: Polarity,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            raw_min: 0,
            raw_max: 4095,
            polarity: Polarity::Direct,
        }
    }
}

impl SensorConfig {
    /// Set the raw range
    pub fn with_range(mut self, raw_min: u16, raw_max: u16) -> Self {
        self.raw_min = raw_min;
        self.raw_max = raw_max;
        self
    }

    /// Set the polarity
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Apply text overrides, e.g. from build-time environment variables.
    ///
    /// `polarity` goes through [`Polarity::from_text`]; the bounds must parse
    /// as `u16`. Missing or unparsable values keep the current setting.
    pub fn with_overrides(
        mut self,
        polarity: Option<&str>,
        raw_min: Option<&str>,
        raw_max: Option<&str>,
    ) -> Self {
        if let Some(polarity) = polarity.and_then(Polarity::from_text) {
            self.polarity = polarity;
        }
        if let Some(min) = raw_min.and_then(|v| v.trim().parse().ok()) {
            self.raw_min = min;
        }
        if let Some(max) = raw_max.and_then(|v| v.trim().parse().ok()) {
            self.raw_max = max;
        }
        self
    }

    /// Build the calibration
    pub fn calibration(&self) -> Calibration {
        Calibration::new(self.raw_min, self.raw_max, self.polarity)
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable device name, shown on the start-up splash
    pub name: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("Smart Irrigation"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.access_point.ssid.as_str(), "SmartIrrigation");
        assert_eq!(config.web.port, 80);
        assert_eq!(config.controller.default_threshold, 40);
        assert_eq!(config.sensor.polarity, Polarity::Direct);
        assert_eq!(config.device.name.as_str(), "Smart Irrigation");
    }

    #[test]
    fn short_string_truncation() {
        let long_input = "a".repeat(100);
        let s = short_string(&long_input);
        assert_eq!(s.len(), MAX_SHORT_STRING);
    }

    #[test]
    fn short_string_utf8_boundary() {
        // 3 bytes each; 21 fit in 64
        let input = "\u{2602}".repeat(30);
        let s = short_string(&input);
        assert_eq!(s.len(), 63);
        assert!(core::str::from_utf8(s.as_bytes()).is_ok());
    }

    #[test]
    fn builder_pattern() {
        let config = Config::default()
            .with_access_point(AccessPointConfig::default().with_ssid("Greenhouse"))
            .with_web(WebConfig::default().with_port(3000))
            .with_device(DeviceConfig::default().with_name("Bed 2"));

        assert_eq!(config.access_point.ssid.as_str(), "Greenhouse");
        assert_eq!(config.web.port, 3000);
        assert_eq!(config.device.name.as_str(), "Bed 2");
    }

    // =========================================================================
    // AccessPointConfig Tests
    // =========================================================================

    #[test]
    fn access_point_default() {
        let ap = AccessPointConfig::default();
        assert_eq!(ap.password.as_str(), "IrrigationSystem2024!");
        assert_eq!(ap.channel, 1);
        assert!(ap.enabled);
        assert!(!ap.is_open());
    }

    #[test]
    fn access_point_builder() {
        let ap = AccessPointConfig::default()
            .with_password("")
            .with_channel(40)
            .with_max_connections(2)
            .with_enabled(false);

        assert!(ap.is_open());
        assert_eq!(ap.channel, 13);
        assert_eq!(ap.max_connections, 2);
        assert!(!ap.enabled);

        assert_eq!(AccessPointConfig::default().with_channel(0).channel, 1);
    }

    // =========================================================================
    // ControllerConfig Tests
    // =========================================================================

    #[test]
    fn controller_config_default() {
        let c = ControllerConfig::default();
        assert_eq!(c.tick_ms, 10);
        assert_eq!(c.sample_interval_ms, 500);
        assert_eq!(c.debounce_ms, 50);
        assert_eq!(c.repeat_ms, 200);
        assert_eq!(c.banner_ms, 1500);
        assert_eq!(c.splash_ms, 2000);
        assert_eq!(c.remote_stale_ms, 30_000);
    }

    #[test]
    fn controller_config_builder_clamps() {
        let c = ControllerConfig::default()
            .with_tick_ms(0)
            .with_default_threshold(150);
        assert_eq!(c.tick_ms, 1);
        assert_eq!(c.default_threshold, 100);
    }

    // =========================================================================
    // SensorConfig Tests
    // =========================================================================

    #[test]
    fn sensor_config_calibration() {
        let cal = SensorConfig::default()
            .with_range(3200, 1200)
            .with_polarity(Polarity::Inverted)
            .calibration();
        assert_eq!(cal.raw_min(), 1200);
        assert_eq!(cal.raw_max(), 3200);
        assert_eq!(cal.to_percent(3200), 0);
        assert_eq!(cal.to_percent(1200), 100);
    }

    #[test]
    fn sensor_config_text_overrides() {
        let sensor =
            SensorConfig::default().with_overrides(Some("dry-high"), Some(" 1200"), Some("3200"));
        assert_eq!(sensor.polarity, Polarity::Inverted);
        assert_eq!(sensor.raw_min, 1200);
        assert_eq!(sensor.raw_max, 3200);
        assert_eq!(sensor.calibration().to_percent(3200), 0);

        // Bad values keep what was there
        let sensor = sensor.with_overrides(Some("sideways"), Some("-1"), Some("70000"));
        assert_eq!(sensor.polarity, Polarity::Inverted);
        assert_eq!(sensor.raw_min, 1200);
        assert_eq!(sensor.raw_max, 3200);

        let sensor = SensorConfig::default().with_overrides(None, None, None);
        assert_eq!(sensor.polarity, Polarity::Direct);
        assert_eq!(sensor.raw_max, 4095);
    }

    // =========================================================================
    // WebConfig Tests
    // =========================================================================

    #[test]
    fn web_config_builder() {
        let web = WebConfig::default()
            .with_port(8080)
            .with_cors(false)
            .with_enabled(false);

        assert_eq!(web.port, 8080);
        assert!(!web.cors_permissive);
        assert!(!web.enabled);
    }
}
