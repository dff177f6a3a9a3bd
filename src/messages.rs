//! Status message sent by `GET /status`.
//!
//! Serialized with `serde_json` on the desktop server and with
//! `serde-json-core` on the ESP32, both producing the same shape:
//!
//! ```json
//! {"moisture":37,"threshold":40,"status":"Irrigating (Manual)"}
//! ```

use crate::actuator::Decision;
use crate::threshold::Threshold;

/// Largest encoded status message.
pub const MAX_STATUS_JSON: usize = 96;

/// Body of the status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatusMessage {
    /// Moisture percent read for this request.
    pub moisture: u8,
    /// Current threshold percent.
    pub threshold: u8,
    /// Irrigation status label, e.g. `"Idle (WiFi)"`.
    pub status: &'static str,
}

impl StatusMessage {
    /// Builds the message from a fresh decision.
    pub fn new(moisture: u8, threshold: Threshold, decision: &Decision) -> Self {
        Self {
            moisture,
            threshold: threshold.percent(),
            status: decision.status.label(),
        }
    }

    /// Encodes to JSON without allocating.
    ///
    /// # Example
    ///
    /// ```
    /// use rs_irrigation::messages::StatusMessage;
    ///
    /// let msg = StatusMessage { moisture: 50, threshold: 40, status: "Idle (WiFi)" };
    /// let json = msg.to_json().unwrap();
    /// assert_eq!(json.as_str(), r#"{"moisture":50,"threshold":40,"status":"Idle (WiFi)"}"#);
    /// ```
    #[cfg(feature = "serde-json-core")]
    pub fn to_json(&self) -> Option<heapless::String<MAX_STATUS_JSON>> {
        serde_json_core::to_string(self).ok()
    }
}
