//! HTTP server for the ESP32 status/control interface.
//!
//! Each handler parses the request URI, locks the shared controller, calls
//! [`IrrigationController::handle`], and writes the [`Response`]. The loop
//! in the binary locks the same mutex for every tick, so a request is never
//! interleaved with a control cycle.
//!
//! # Endpoints
//!
//! - `GET /`, `GET /index.html` - Control page
//! - `GET /status` - `{"moisture":..,"threshold":..,"status":".."}`
//! - `GET /threshold?action=increase|decrease` or `?value=N`
//! - `GET /toggle-mode`
//!
//! Unregistered paths get the ESP-IDF default 404.
//!
//! # Example
//!
//! ```ignore
//! use rs_irrigation::hal::esp32::{Esp32Clock, Esp32HttpServer};
//! use rs_irrigation::config::WebConfig;
//! use std::sync::{Arc, Mutex};
//!
//! let shared = Arc::new(Mutex::new(controller));
//! let server = Esp32HttpServer::new(&WebConfig::default(), shared.clone(), Esp32Clock::new())?;
//! ```

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use esp_idf_hal::io::Write;
use esp_idf_svc::http::server::{Configuration, EspHttpConnection, EspHttpServer, Request};
use esp_idf_svc::http::Method;

use super::{Esp32Board, Esp32Clock, NvsThresholdStorage};
use crate::config::WebConfig;
use crate::controller::IrrigationController;
use crate::endpoints::{self, Response, INDEX_HTML, NOT_FOUND_TEXT};
use crate::traits::Clock;

/// Controller shared between the HTTP handlers and the main loop.
pub type SharedEspController = Arc<Mutex<IrrigationController<Esp32Board, NvsThresholdStorage>>>;

/// Paths with a handler.
const ROUTES: [&str; 5] = ["/", "/index.html", "/status", "/threshold", "/toggle-mode"];

/// HTTP server for the irrigation API.
pub struct Esp32HttpServer {
    _server: EspHttpServer<'static>,
}

impl Esp32HttpServer {
    /// Create and start the HTTP server.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP server fails to start.
    pub fn new(
        config: &WebConfig,
        controller: SharedEspController,
        clock: Esp32Clock,
    ) -> anyhow::Result<Self> {
        let server_config = Configuration {
            http_port: config.port,
            ..Default::default()
        };

        let mut server = EspHttpServer::new(&server_config)?;

        for path in ROUTES {
            let controller = controller.clone();
            server.fn_handler::<anyhow::Error, _>(path, Method::Get, move |req| {
                let request = endpoints::Request::from_uri(req.uri());
                let response = {
                    let mut ctl = controller
                        .lock()
                        .map_err(|_| anyhow!("controller lock poisoned"))?;
                    ctl.handle(&request, clock.now_ms())
                };
                log::debug!("[HTTP] {} -> {}", req.uri(), response.status_code());
                write_response(req, &response)
            })?;
        }

        log::info!("[HTTP] Server started on port {}", config.port);

        Ok(Self { _server: server })
    }
}

fn write_response(
    req: Request<&mut EspHttpConnection<'_>>,
    response: &Response,
) -> anyhow::Result<()> {
    let json;
    let body: &[u8] = match response {
        Response::Status(msg) => {
            json = msg
                .to_json()
                .ok_or_else(|| anyhow!("status JSON exceeds buffer"))?;
            json.as_bytes()
        }
        Response::Text(text) => text.as_bytes(),
        Response::Page => INDEX_HTML.as_bytes(),
        Response::NotFound => NOT_FOUND_TEXT.as_bytes(),
    };

    let mut resp = req.into_response(
        response.status_code(),
        None,
        &[("Content-Type", response.content_type())],
    )?;
    resp.write_all(body)?;
    Ok(())
}
