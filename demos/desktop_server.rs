//! Desktop simulator for the irrigation controller.
//!
//! Runs the controller against the mock board with a simulated soil
//! model: the soil dries slowly and gets wetter while the pump relay is on.
//! The HTTP API and web UI are served on port 8080.
//!
//! ```bash
//! cargo run --example desktop_server --features web
//! # then open http://localhost:8080/
//! ```

use std::sync::Arc;
use std::time::Duration;

use rs_irrigation::hal::{MockBoard, MockStorage};
use rs_irrigation::services::{run_server, SharedController, WebServerConfig};
use rs_irrigation::{Config, IrrigationController};

/// Control loop period.
const TICK_MS: u64 = 10;

/// Raw ADC counts lost per tick while the pump is off.
const DRY_RATE: u16 = 1;

/// Raw ADC counts gained per tick while the pump is on.
const WET_RATE: u16 = 6;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let config = Config::default();

    let mut hw = MockBoard::hardware();
    hw.sensor.raw = 2400;
    let controller = IrrigationController::new(hw, MockStorage::new(), &config);
    let shared = Arc::new(SharedController::new(controller));

    println!("rs-irrigation desktop simulator");
    println!("  GET /status, /threshold?action=increase|decrease, /threshold?value=N, /toggle-mode");

    let ticker = Arc::clone(&shared);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(TICK_MS));
        loop {
            interval.tick().await;
            ticker.with_controller(|c| {
                let pumping = c.hardware().relay.level;
                let sensor = &mut c.hardware_mut().sensor;
                sensor.raw = if pumping {
                    sensor.raw.saturating_add(WET_RATE).min(4095)
                } else {
                    sensor.raw.saturating_sub(DRY_RATE)
                };
            });
            ticker.tick();
        }
    });

    run_server(shared, WebServerConfig::from_config(&config.web.clone().with_port(8080))).await
}
