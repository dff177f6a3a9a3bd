//! # rs-irrigation
//!
//! A soil-moisture irrigation controller with a three-button threshold
//! menu, a 16x2 character display, and a Wi-Fi status/control API.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Traits for the moisture probe, relay/buzzer outputs,
//!   buttons, character display, and threshold persistence
//! - **Two modes**: Manual (local sensor loop drives the pump) and WiFi
//!   (the pump follows status polls from the network client)
//! - **Critical alarm**: Buzzer sounds below 20% moisture in every mode
//! - **Debounced menu**: Menu, increase, and decrease buttons with auto-repeat
//! - **Persistent threshold**: Stored on change, restored at boot
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware and storage abstractions
//! - `sensor` - Raw ADC to moisture percentage
//! - `debounce` - Button debouncing and auto-repeat
//! - `threshold` - Threshold value and persistence
//! - `actuator` - Relay/buzzer decision rules
//! - `state` - Shared menu/mode/threshold state
//! - `endpoints` - HTTP endpoint semantics (server independent)
//! - `render` - Display frame composition
//! - `controller` - Main loop tying everything together
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_irrigation::{Config, IrrigationController, Request, Response};
//! use rs_irrigation::hal::{MockBoard, MockStorage};
//!
//! let mut controller =
//!     IrrigationController::new(MockBoard::hardware(), MockStorage::new(), &Config::default());
//! controller.start(0);
//!
//! // Network request: switch to WiFi mode
//! let resp = controller.handle(&Request::from_uri("/toggle-mode"), 0);
//! assert_eq!(resp, Response::Text("Mode toggled"));
//!
//! // Update in your main loop
//! controller.tick(10); // 10ms tick
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Relay and buzzer decision rules.
pub mod actuator;
/// Main controller that coordinates buttons, sensor, outputs, and display.
pub mod controller;
/// Button debouncing with auto-repeat.
pub mod debounce;
/// Network endpoint semantics shared by the desktop and ESP32 servers.
pub mod endpoints;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Display frame composition.
pub mod render;
/// Moisture sensor calibration and percentage conversion.
pub mod sensor;
/// Shared controller state: menu, mode, threshold, banner.
pub mod state;
/// Threshold value type and persistence.
pub mod threshold;
/// Core traits for hardware abstraction.
pub mod traits;

/// Shared configuration system for desktop and ESP32.
pub mod config;

/// Query-string parsing helpers for the HTTP API.
pub mod parsing;

/// Status message type for the HTTP API.
pub mod messages;

/// Network services for the desktop HTTP API (feature-gated).
#[cfg(feature = "web")]
pub mod services;

// Re-exports for convenience
pub use actuator::{
    evaluate, is_critical, ActuatorOutputs, Decision, IrrigationStatus, SystemMode,
    CRITICAL_MOISTURE_PERCENT,
};
pub use controller::IrrigationController;
pub use debounce::{ButtonEvents, Debouncer};
pub use endpoints::{handle_request, Request, RequestContext, Response, ThresholdRequest};
pub use render::{compose, Frame};
pub use sensor::{Calibration, Polarity, SensorReader};
pub use state::{Banner, ControllerState};
pub use threshold::{Step, Threshold, ThresholdStore, DEFAULT_THRESHOLD_PERCENT};
pub use traits::{
    AnalogInput, Board, ButtonInput, ButtonLevels, CharDisplay, Clock, DigitalOutput, Hardware,
    ThresholdStorage,
};

// Config re-exports
pub use config::{
    AccessPointConfig, Config, ControllerConfig, DeviceConfig, SensorConfig, WebConfig,
};

// Message re-exports (for the HTTP API)
pub use messages::StatusMessage;
