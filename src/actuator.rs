//! Irrigation decision: relay and buzzer from moisture and threshold.
//!
//! [`evaluate`] is pure. Where and when its outputs are applied (sampling
//! tick vs. status request, menu open or closed) is decided by
//! [`ControllerState`](crate::state::ControllerState).
//!
//! # Example
//!
//! ```rust
//! use rs_irrigation::actuator::{evaluate, SystemMode};
//! use rs_irrigation::threshold::Threshold;
//!
//! let d = evaluate(15, Threshold::clamped(40), SystemMode::Manual);
//! assert!(d.outputs.relay);
//! assert!(d.outputs.buzzer);
//! assert_eq!(d.status.label(), "Irrigating (Manual)");
//! ```

use crate::threshold::Threshold;

/// Moisture below this percentage sounds the buzzer, in every mode.
pub const CRITICAL_MOISTURE_PERCENT: u8 = 20;

/// Who drives the relay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SystemMode {
    /// The sampling tick drives the relay.
    #[default]
    Manual,
    /// The relay follows status requests from the web client.
    Wifi,
}

impl SystemMode {
    /// The other mode.
    #[inline]
    pub const fn toggled(self) -> Self {
        match self {
            SystemMode::Manual => SystemMode::Wifi,
            SystemMode::Wifi => SystemMode::Manual,
        }
    }

    /// Short name used in status labels.
    pub const fn name(self) -> &'static str {
        match self {
            SystemMode::Manual => "Manual",
            SystemMode::Wifi => "WiFi",
        }
    }

    /// Banner text shown after switching into this mode.
    pub const fn banner(self) -> &'static str {
        match self {
            SystemMode::Manual => "Manual Mode",
            SystemMode::Wifi => "WiFi Mode",
        }
    }
}

/// Desired levels of the two outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActuatorOutputs {
    /// Pump relay energised.
    pub relay: bool,
    /// Alarm buzzer sounding.
    pub buzzer: bool,
}

/// Irrigation status as reported to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IrrigationStatus {
    /// Whether the relay rule says to water.
    pub irrigating: bool,
    /// Mode at evaluation time.
    pub mode: SystemMode,
}

impl IrrigationStatus {
    /// Human-readable label, e.g. `"Idle (WiFi)"`.
    pub const fn label(&self) -> &'static str {
        match (self.irrigating, self.mode) {
            (true, SystemMode::Manual) => "Irrigating (Manual)",
            (false, SystemMode::Manual) => "Idle (Manual)",
            (true, SystemMode::Wifi) => "Irrigating (WiFi)",
            (false, SystemMode::Wifi) => "Idle (WiFi)",
        }
    }
}

impl core::fmt::Display for IrrigationStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    /// Output levels the rules call for.
    pub outputs: ActuatorOutputs,
    /// Status for reporting.
    pub status: IrrigationStatus,
}

/// Returns true when moisture is critically low.
#[inline]
pub const fn is_critical(moisture: u8) -> bool {
    moisture < CRITICAL_MOISTURE_PERCENT
}

/// Applies the irrigation rules.
///
/// The relay rule is `moisture < threshold`; the buzzer rule is
/// `moisture < CRITICAL_MOISTURE_PERCENT`. The two are independent, so a
/// threshold below 20 can sound the alarm without watering.
pub fn evaluate(moisture: u8, threshold: Threshold, mode: SystemMode) -> Decision {
    let relay = moisture < threshold.percent();
    Decision {
        outputs: ActuatorOutputs {
            relay,
            buzzer: is_critical(moisture),
        },
        status: IrrigationStatus {
            irrigating: relay,
            mode,
        },
    }
}
