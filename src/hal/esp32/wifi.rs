//! Wi-Fi access point for ESP32.
//!
//! The controller hosts its own network so it works in a field with no
//! infrastructure. Clients join it and browse to the gateway address
//! (192.168.4.1 with the default ESP-IDF netif).
//!
//! # Example
//!
//! ```ignore
//! use rs_irrigation::hal::esp32::Esp32AccessPoint;
//! use rs_irrigation::config::AccessPointConfig;
//!
//! let ap = Esp32AccessPoint::new(modem, sysloop, Some(nvs), &AccessPointConfig::default())?;
//! log::info!("browse to http://{:?}", ap.ip_addr());
//! ```

use std::net::Ipv4Addr;

use anyhow::anyhow;
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{AccessPointConfiguration, AuthMethod, BlockingWifi, Configuration, EspWifi};

use crate::config::AccessPointConfig;

/// Access-point mode Wi-Fi.
///
/// The radio stays up for the lifetime of this struct.
pub struct Esp32AccessPoint<'a> {
    wifi: BlockingWifi<EspWifi<'a>>,
}

impl<'a> Esp32AccessPoint<'a> {
    /// Start the access point.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - WiFi initialization fails
    /// - The SSID or password is too long for the driver
    /// - The AP interface does not come up
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
        config: &AccessPointConfig,
    ) -> anyhow::Result<Self> {
        let esp_wifi = EspWifi::new(modem, sysloop.clone(), nvs)?;
        let mut wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;

        let auth_method = if config.is_open() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        wifi.set_configuration(&Configuration::AccessPoint(AccessPointConfiguration {
            ssid: config
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| anyhow!("AP SSID too long"))?,
            password: config
                .password
                .as_str()
                .try_into()
                .map_err(|_| anyhow!("AP password too long"))?,
            auth_method,
            channel: config.channel,
            max_connections: config.max_connections,
            ..Default::default()
        }))?;

        log::info!("[WiFi] Starting access point '{}'...", config.ssid);
        wifi.start()?;
        wifi.wait_netif_up()?;

        let ap = Self { wifi };
        if let Some(ip) = ap.ip_addr() {
            log::info!("[WiFi] AP up, browse to http://{}", ip);
        }
        Ok(ap)
    }

    /// Gateway address clients should browse to.
    pub fn ip_addr(&self) -> Option<Ipv4Addr> {
        self.wifi
            .wifi()
            .ap_netif()
            .get_ip_info()
            .ok()
            .map(|info| info.ip)
    }

    /// Stop the access point.
    pub fn stop(&mut self) -> anyhow::Result<()> {
        self.wifi.stop()?;
        Ok(())
    }
}
