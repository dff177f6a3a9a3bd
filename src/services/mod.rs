//! Network services for the desktop HTTP API.
//!
//! The `web` feature provides an Axum server that answers the same
//! endpoints as the ESP32 firmware, backed by one shared controller:
//!
//! ```ignore
//! use std::sync::Arc;
//! use rs_irrigation::services::{build_router, SharedController, WebServerConfig};
//!
//! let shared = Arc::new(SharedController::new(controller));
//!
//! // Tick task and web server use the same controller
//! let ticker = Arc::clone(&shared);
//! tokio::spawn(async move { loop { ticker.tick(); /* sleep 10ms */ } });
//! let router = build_router(shared, &WebServerConfig::default());
//! ```

pub mod shared;
pub mod web;

pub use shared::*;
pub use web::*;
