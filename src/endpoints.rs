//! HTTP endpoint semantics, independent of any server library.
//!
//! [`handle_request`] is the whole behaviour of the network interface: it
//! takes the shared state and a parsed [`Request`], mutates the state, and
//! returns a [`Response`]. The axum router and the ESP-IDF server are thin
//! adapters that parse the URI, call the controller, and write the response.
//!
//! | Path | Effect | Body |
//! |------|--------|------|
//! | `/status` | Sample moisture; buzzer rule; relay rule in WiFi mode | JSON status |
//! | `/threshold?action=increase\|decrease` | Step threshold | `Threshold updated` |
//! | `/threshold?value=N` | Set threshold (clamped) | `Threshold updated` |
//! | `/toggle-mode` | Flip Manual/WiFi | `Mode toggled` |
//! | `/` | None | HTML control page |
//!
//! # Example
//!
//! ```rust
//! use rs_irrigation::endpoints::{handle_request, Request, RequestContext, Response};
//! use rs_irrigation::hal::MockStorage;
//! use rs_irrigation::state::ControllerState;
//! use rs_irrigation::threshold::ThresholdStore;
//!
//! let mut state = ControllerState::new(ThresholdStore::load(MockStorage::new(), 40), 1500);
//! let ctx = RequestContext { moisture: 50, now_ms: 0 };
//!
//! let req = Request::from_uri("/threshold?value=55");
//! assert_eq!(handle_request(&mut state, &req, ctx), Response::Text("Threshold updated"));
//! assert_eq!(state.threshold().percent(), 55);
//! ```

use crate::messages::StatusMessage;
use crate::parsing::{query_param, to_int};
use crate::state::ControllerState;
use crate::threshold::Step;
use crate::traits::ThresholdStorage;

/// Body of a successful threshold request.
pub const THRESHOLD_ACK: &str = "Threshold updated";

/// Body of a successful mode toggle.
pub const TOGGLE_ACK: &str = "Mode toggled";

/// Body of a 404 response.
pub const NOT_FOUND_TEXT: &str = "Not found";

/// The control page served at `/`.
pub const INDEX_HTML: &str = include_str!("../www/index.html");

/// What a `/threshold` request asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThresholdRequest {
    /// `action=increase` or `action=decrease`.
    Adjust(Step),
    /// `action` present with any other value. No-op.
    UnknownAction,
    /// `value=N`, already converted with [`to_int`].
    Set(i32),
    /// Neither parameter present. No-op.
    Empty,
}

impl ThresholdRequest {
    /// Interprets a raw query string.
    ///
    /// `action` takes precedence over `value` when both are present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_irrigation::endpoints::ThresholdRequest;
    /// use rs_irrigation::threshold::Step;
    ///
    /// assert_eq!(ThresholdRequest::from_query("action=increase&value=10"),
    ///            ThresholdRequest::Adjust(Step::Up));
    /// assert_eq!(ThresholdRequest::from_query("value=abc"), ThresholdRequest::Set(0));
    /// ```
    pub fn from_query(query: &str) -> Self {
        if let Some(action) = query_param(query, "action") {
            return match action.as_str() {
                "increase" => ThresholdRequest::Adjust(Step::Up),
                "decrease" => ThresholdRequest::Adjust(Step::Down),
                _ => ThresholdRequest::UnknownAction,
            };
        }
        match query_param(query, "value") {
            Some(value) => ThresholdRequest::Set(to_int(&value)),
            None => ThresholdRequest::Empty,
        }
    }
}

/// A parsed inbound request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// `GET /`
    Index,
    /// `GET /status`
    Status,
    /// `GET /threshold?...`
    Threshold(ThresholdRequest),
    /// `GET /toggle-mode`
    ToggleMode,
    /// Anything else.
    NotFound,
}

impl Request {
    /// Parses a path and optional raw query string.
    pub fn parse(path: &str, query: Option<&str>) -> Self {
        match path {
            "/" | "/index.html" => Request::Index,
            "/status" => Request::Status,
            "/threshold" => Request::Threshold(ThresholdRequest::from_query(query.unwrap_or(""))),
            "/toggle-mode" => Request::ToggleMode,
            _ => Request::NotFound,
        }
    }

    /// Parses a request target such as `/threshold?value=5`.
    pub fn from_uri(uri: &str) -> Self {
        match uri.split_once('?') {
            Some((path, query)) => Self::parse(path, Some(query)),
            None => Self::parse(uri, None),
        }
    }

    /// Returns true if handling this request needs a fresh sensor sample.
    #[inline]
    pub fn needs_sample(&self) -> bool {
        matches!(self, Request::Status)
    }
}

/// Per-request inputs that come from outside the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestContext {
    /// Moisture sampled for this request (only read by `/status`).
    pub moisture: u8,
    /// Request time.
    pub now_ms: u64,
}

/// Response to a handled request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    /// JSON status body.
    Status(StatusMessage),
    /// Plain-text acknowledgement.
    Text(&'static str),
    /// The HTML control page.
    Page,
    /// 404.
    NotFound,
}

impl Response {
    /// HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            Response::NotFound => 404,
            _ => 200,
        }
    }

    /// `Content-Type` header value.
    pub fn content_type(&self) -> &'static str {
        match self {
            Response::Status(_) => "application/json",
            Response::Page => "text/html",
            Response::Text(_) | Response::NotFound => "text/plain",
        }
    }
}

/// Applies one request to the state.
///
/// Runs to completion; callers must hold exclusive access to `state` for
/// the duration, so a request never interleaves with a control tick.
pub fn handle_request<P: ThresholdStorage>(
    state: &mut ControllerState<P>,
    request: &Request,
    ctx: RequestContext,
) -> Response {
    match *request {
        Request::Index => Response::Page,
        Request::Status => {
            let decision = state.on_status_request(ctx.moisture, ctx.now_ms);
            Response::Status(StatusMessage::new(ctx.moisture, state.threshold(), &decision))
        }
        Request::Threshold(req) => {
            match req {
                ThresholdRequest::Adjust(step) => {
                    state.adjust_threshold(step);
                }
                ThresholdRequest::Set(value) => {
                    state.set_threshold(value);
                }
                ThresholdRequest::UnknownAction | ThresholdRequest::Empty => {
                    log::debug!("threshold request without effect: {:?}", req);
                }
            }
            Response::Text(THRESHOLD_ACK)
        }
        Request::ToggleMode => {
            state.toggle_mode(ctx.now_ms);
            Response::Text(TOGGLE_ACK)
        }
        Request::NotFound => Response::NotFound,
    }
}
