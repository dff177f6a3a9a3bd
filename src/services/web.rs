//! Axum-based HTTP server for the irrigation controller API.
//!
//! Provides endpoints for:
//! - GET `/status` - Fresh moisture sample, threshold, and irrigation status
//! - GET `/threshold?action=increase|decrease` or `?value=N` - Change threshold
//! - GET `/toggle-mode` - Switch between Manual and WiFi mode
//! - GET `/` - Web UI (serves index.html)
//!
//! Every route builds an [`endpoints::Request`](crate::endpoints::Request)
//! and hands it to the shared controller, so the desktop server and the
//! ESP32 server answer identically.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::WebConfig;
use crate::controller::IrrigationController;
use crate::endpoints::{Request, Response, INDEX_HTML, NOT_FOUND_TEXT};
use crate::traits::{Board, ThresholdStorage};

use super::shared::SharedController;

/// Axum state for the routes.
pub type AppState<B, P> = Arc<SharedController<B, P>>;

// ============================================================================
// Response Conversion
// ============================================================================

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        match self {
            Response::Status(msg) => Json(msg).into_response(),
            Response::Text(text) => {
                (StatusCode::OK, [(header::CONTENT_TYPE, self.content_type())], text)
                    .into_response()
            }
            Response::Page => Html(INDEX_HTML).into_response(),
            Response::NotFound => (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, self.content_type())],
                NOT_FOUND_TEXT,
            )
                .into_response(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /status - Samples moisture and reports the irrigation status
async fn status<B, P>(State(state): State<AppState<B, P>>) -> Response
where
    B: Board + 'static,
    P: ThresholdStorage + 'static,
    IrrigationController<B, P>: Send,
{
    state.handle(&Request::Status)
}

/// GET /threshold - Adjusts or sets the threshold
///
/// Accepts `?action=increase`, `?action=decrease`, or `?value=N`.
/// Uses the same query parser as ESP32 for consistency.
async fn threshold<B, P>(
    State(state): State<AppState<B, P>>,
    RawQuery(query): RawQuery,
) -> Response
where
    B: Board + 'static,
    P: ThresholdStorage + 'static,
    IrrigationController<B, P>: Send,
{
    state.handle(&Request::parse("/threshold", query.as_deref()))
}

/// GET /toggle-mode - Switches Manual/WiFi
async fn toggle_mode<B, P>(State(state): State<AppState<B, P>>) -> Response
where
    B: Board + 'static,
    P: ThresholdStorage + 'static,
    IrrigationController<B, P>: Send,
{
    state.handle(&Request::ToggleMode)
}

/// GET / - Serve the web UI
async fn index() -> Response {
    Response::Page
}

/// Fallback handler for 404
async fn not_found() -> Response {
    Response::NotFound
}

// ============================================================================
// Server Builder
// ============================================================================

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Address to bind to
    pub addr: SocketAddr,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_permissive: true,
        }
    }
}

impl WebServerConfig {
    /// Create a new config with the given address
    pub fn new(addr: impl Into<SocketAddr>) -> Self {
        Self {
            addr: addr.into(),
            ..Default::default()
        }
    }

    /// Set whether CORS should be permissive
    pub fn cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Create from shared WebConfig
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            addr: ([0, 0, 0, 0], config.port).into(),
            cors_permissive: config.cors_permissive,
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router<B, P>(state: AppState<B, P>, config: &WebServerConfig) -> Router
where
    B: Board + 'static,
    P: ThresholdStorage + 'static,
    IrrigationController<B, P>: Send,
{
    let mut router = Router::new()
        // API routes
        .route("/status", get(status::<B, P>))
        .route("/threshold", get(threshold::<B, P>))
        .route("/toggle-mode", get(toggle_mode::<B, P>))
        // Web UI
        .route("/", get(index))
        .route("/index.html", get(index))
        // Fallback
        .fallback(not_found)
        .with_state(state);

    // Add CORS if requested
    if config.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// Start the web server with a shared controller
///
/// This function blocks until the server is shut down. The caller keeps a
/// clone of `state` to drive [`SharedController::tick`].
pub async fn run_server<B, P>(
    state: AppState<B, P>,
    config: WebServerConfig,
) -> Result<(), std::io::Error>
where
    B: Board + 'static,
    P: ThresholdStorage + 'static,
    IrrigationController<B, P>: Send,
{
    let router = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    println!("Web server listening on http://{}", config.addr);

    axum::serve(listener, router).await
}
