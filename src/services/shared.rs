//! Shared controller for the desktop services.
//!
//! `SharedController` wraps a single [`IrrigationController`] so the HTTP
//! handlers and the tick task see the same state.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rs_irrigation::services::SharedController;
//!
//! let shared = Arc::new(SharedController::new(controller));
//!
//! // Tick task
//! shared.tick();
//!
//! // HTTP handler
//! let response = shared.handle(&Request::Status);
//! ```

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crate::controller::IrrigationController;
use crate::endpoints::{Request, Response};
use crate::traits::{Board, ThresholdStorage};

// ============================================================================
// Shared Controller
// ============================================================================

/// One controller shared between the tick loop and the web handlers.
///
/// # Thread Safety
///
/// - Uses a single `Mutex` around the controller: a tick and a request
///   each run to completion under the lock, so they never interleave.
/// - All timestamps come from the same `start_time`.
pub struct SharedController<B: Board, P: ThresholdStorage> {
    controller: Mutex<IrrigationController<B, P>>,
    start_time: Instant,
}

impl<B: Board, P: ThresholdStorage> SharedController<B, P> {
    /// Wraps a controller and starts it at time zero.
    pub fn new(mut controller: IrrigationController<B, P>) -> Self {
        controller.start(0);
        Self {
            controller: Mutex::new(controller),
            start_time: Instant::now(),
        }
    }

    /// Milliseconds since the shared controller was created.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Access the controller under the lock.
    ///
    /// The closure pattern prevents holding the lock across await points.
    /// A poisoned lock is recovered.
    pub fn with_controller<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut IrrigationController<B, P>) -> R,
    {
        let mut guard = self
            .controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Runs one control tick at the current time.
    pub fn tick(&self) {
        let now_ms = self.now_ms();
        self.with_controller(|c| c.tick(now_ms));
    }

    /// Handles one network request at the current time.
    pub fn handle(&self, request: &Request) -> Response {
        let now_ms = self.now_ms();
        self.with_controller(|c| c.handle(request, now_ms))
    }
}
