//! Main irrigation controller that ties everything together.
//!
//! [`IrrigationController`] owns the hardware, the shared state, and the
//! timing bookkeeping. Two entry points mutate it:
//!
//! - [`tick`](IrrigationController::tick), called every loop period
//! - [`handle`](IrrigationController::handle), called once per network request
//!
//! Each runs to completion, so on hosted platforms wrapping the controller
//! in one `Mutex` is enough to keep requests from interleaving with ticks.
//!
//! # Tick ordering
//!
//! 1. Poll buttons, debounce, apply menu/threshold events
//! 2. Expire a finished banner
//! 3. On the sampling interval: read the sensor and apply the local rules
//! 4. Write outputs that changed
//! 5. Redraw the display if the frame changed
//!
//! # Example
//!
//! ```rust
//! use rs_irrigation::{Config, IrrigationController};
//! use rs_irrigation::hal::{MockBoard, MockStorage};
//!
//! let config = Config::default();
//! let mut controller =
//!     IrrigationController::new(MockBoard::hardware(), MockStorage::new(), &config);
//! controller.start(0);
//!
//! // Dry soil: raw 600 of 4095 is 14%
//! controller.hardware_mut().sensor.raw = 600;
//! for t in (0..=3000).step_by(10) {
//!     controller.tick(t);
//! }
//! assert!(controller.hardware().relay.level);
//! assert!(controller.hardware().buzzer.level);
//! assert_eq!(controller.hardware().display.line(0), "Moisture: 14%");
//! ```

use crate::actuator::{ActuatorOutputs, SystemMode};
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::endpoints::{handle_request, Request, RequestContext, Response};
use crate::render::{compose, Frame};
use crate::sensor::SensorReader;
use crate::state::ControllerState;
use crate::threshold::{Threshold, ThresholdStore};
use crate::traits::{
    Board, ButtonInput, CharDisplay, DigitalOutput, Hardware, ThresholdStorage,
};

/// Timing values the loop needs, widened to `u64` milliseconds.
#[derive(Clone, Copy, Debug)]
struct Timing {
    sample_interval_ms: u64,
    splash_ms: u64,
    remote_stale_ms: u64,
}

/// Main irrigation controller.
///
/// # Type Parameters
///
/// - `B`: The platform's hardware types ([`Board`] trait)
/// - `P`: Threshold persistence ([`ThresholdStorage`] trait)
///
/// # Thread Safety
///
/// The controller itself is not thread-safe. For a web server plus main
/// loop, wrap it in `Arc<Mutex<IrrigationController>>` or use the
/// `SharedController` wrapper from the services module (requires `web`).
pub struct IrrigationController<B: Board, P: ThresholdStorage> {
    hw: Hardware<B>,
    state: ControllerState<P>,
    debouncer: Debouncer,
    reader: SensorReader,
    timing: Timing,
    splash: crate::config::ShortString,
    next_sample_ms: Option<u64>,
    relay_written: Option<bool>,
    buzzer_written: Option<bool>,
    shown: Option<Frame>,
}

impl<B: Board, P: ThresholdStorage> IrrigationController<B, P> {
    /// Create a controller. Loads the threshold from `storage`.
    ///
    /// Nothing is written to the hardware until [`start`](Self::start).
    pub fn new(hw: Hardware<B>, storage: P, config: &Config) -> Self {
        let c = &config.controller;
        let threshold = ThresholdStore::load(storage, c.default_threshold);
        log::info!("threshold {} loaded", threshold.get());

        Self {
            hw,
            state: ControllerState::new(threshold, u64::from(c.banner_ms)),
            debouncer: Debouncer::new(u64::from(c.debounce_ms), u64::from(c.repeat_ms)),
            reader: SensorReader::new(config.sensor.calibration()),
            timing: Timing {
                sample_interval_ms: u64::from(c.sample_interval_ms),
                splash_ms: u64::from(c.splash_ms),
                remote_stale_ms: u64::from(c.remote_stale_ms),
            },
            splash: config.device.name.clone(),
            next_sample_ms: None,
            relay_written: None,
            buzzer_written: None,
            shown: None,
        }
    }

    /// Initialize the display, drive both outputs low, and show the splash.
    pub fn start(&mut self, now_ms: u64) {
        if let Err(e) = self.hw.display.init() {
            log::warn!("display init failed: {:?}", e);
        }
        if self.timing.splash_ms > 0 {
            self.state
                .show_banner(&self.splash, now_ms, self.timing.splash_ms);
        }
        self.apply_outputs();
        self.render(now_ms);
    }

    /// Run one loop iteration - call every tick (e.g., 10ms)
    pub fn tick(&mut self, now_ms: u64) {
        let levels = self.hw.buttons.read_levels();
        let events = self.debouncer.poll(levels, now_ms);
        if events.any() {
            let outcome = self.state.on_buttons(events);
            if outcome.menu_toggled {
                self.debouncer.rearm(now_ms);
            }
        }

        self.state.expire_banner(now_ms);

        if self.next_sample_ms.map_or(true, |due| now_ms >= due) {
            let moisture = self.reader.read_percent(&mut self.hw.sensor);
            self.state.on_sample(moisture);
            self.next_sample_ms = Some(now_ms + self.timing.sample_interval_ms);
        }

        if self.timing.remote_stale_ms > 0
            && self
                .state
                .check_remote_stale(now_ms, self.timing.remote_stale_ms)
        {
            log::warn!(
                "WiFi mode: no status request for {}ms, relay held at {}",
                self.timing.remote_stale_ms,
                if self.state.outputs().relay { "ON" } else { "OFF" }
            );
        }

        self.apply_outputs();
        self.render(now_ms);
    }

    /// Handle one network request to completion.
    ///
    /// `/status` takes a fresh sensor sample; other requests reuse the last
    /// recorded moisture.
    pub fn handle(&mut self, request: &Request, now_ms: u64) -> Response {
        let moisture = if request.needs_sample() {
            self.reader.read_percent(&mut self.hw.sensor)
        } else {
            self.state.moisture().unwrap_or(0)
        };

        let ctx = RequestContext { moisture, now_ms };
        let response = handle_request(&mut self.state, request, ctx);

        self.apply_outputs();
        self.render(now_ms);
        response
    }

    /// Write outputs whose desired level differs from the last write.
    ///
    /// A failed write is logged and retried on the next call.
    fn apply_outputs(&mut self) {
        let desired = self.state.outputs();
        write_if_changed(&mut self.hw.relay, &mut self.relay_written, desired.relay, "relay");
        write_if_changed(&mut self.hw.buzzer, &mut self.buzzer_written, desired.buzzer, "buzzer");
    }

    /// Redraw the display when the composed frame changes.
    fn render(&mut self, now_ms: u64) {
        if self.state.take_clear() {
            if let Err(e) = self.hw.display.clear() {
                log::warn!("display clear failed: {:?}", e);
            }
            self.shown = None;
        }

        let frame = compose(&self.state, now_ms);
        if self.shown.as_ref() == Some(&frame) {
            return;
        }

        let result = frame
            .rows
            .iter()
            .zip(0u8..)
            .try_for_each(|(text, row)| self.hw.display.write_at(row, 0, text))
            .and_then(|()| self.hw.display.flush());

        match result {
            Ok(()) => self.shown = Some(frame),
            Err(e) => log::warn!("display write failed: {:?}", e),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Shared state (menu, mode, threshold, desired outputs)
    pub fn state(&self) -> &ControllerState<P> {
        &self.state
    }

    /// Mutable shared state
    pub fn state_mut(&mut self) -> &mut ControllerState<P> {
        &mut self.state
    }

    /// Owned peripherals
    pub fn hardware(&self) -> &Hardware<B> {
        &self.hw
    }

    /// Mutable peripherals (simulation and tests)
    pub fn hardware_mut(&mut self) -> &mut Hardware<B> {
        &mut self.hw
    }

    /// Current threshold
    pub fn threshold(&self) -> Threshold {
        self.state.threshold()
    }

    /// Current system mode
    pub fn mode(&self) -> SystemMode {
        self.state.mode()
    }

    /// Desired output levels
    pub fn outputs(&self) -> ActuatorOutputs {
        self.state.outputs()
    }

    /// Whether the threshold menu is open
    pub fn menu_active(&self) -> bool {
        self.state.menu_active()
    }
}

fn write_if_changed<O: DigitalOutput>(
    pin: &mut O,
    written: &mut Option<bool>,
    level: bool,
    name: &str,
) {
    if *written == Some(level) {
        return;
    }
    match pin.set_level(level) {
        Ok(()) => {
            log::debug!("{} -> {}", name, if level { "ON" } else { "OFF" });
            *written = Some(level);
        }
        Err(e) => {
            log::warn!("{} write failed: {:?}", name, e);
            *written = None;
        }
    }
}
