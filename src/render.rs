//! Display frames composed from controller state.
//!
//! [`compose`] is a pure function of the state and the current time. The
//! controller compares each frame with the last one written and only pushes
//! changes to the display, so an idle loop costs no bus traffic.
//!
//! Layouts (16 columns, rows padded with spaces):
//!
//! ```text
//! Normal            Menu              Banner
//! Moisture: 37%     Set Threshold:    WiFi Mode
//! Status: Irrigate  40%
//! ```

use core::fmt::Write;

use heapless::String as HString;

use crate::actuator::SystemMode;
use crate::state::ControllerState;
use crate::traits::{ThresholdStorage, DISPLAY_COLS, DISPLAY_ROWS};

/// One display row.
pub type Row = HString<{ DISPLAY_COLS as usize }>;

/// Full display contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Rows top to bottom, each exactly [`DISPLAY_COLS`] wide.
    pub rows: [Row; DISPLAY_ROWS as usize],
}

impl Frame {
    /// Builds a frame from row texts, truncating and padding each row.
    pub fn from_lines(top: &str, bottom: &str) -> Self {
        Self {
            rows: [padded(top), padded(bottom)],
        }
    }

    /// Row text with trailing padding removed.
    pub fn line(&self, row: usize) -> &str {
        self.rows.get(row).map(|r| r.trim_end()).unwrap_or("")
    }
}

fn padded(text: &str) -> Row {
    let mut row = Row::new();
    for c in text.chars() {
        if row.push(c).is_err() {
            break;
        }
    }
    while row.push(' ').is_ok() {}
    row
}

/// Composes the frame to show at `now_ms`.
///
/// Priority: active banner, then the threshold menu, then the normal
/// moisture/status screen.
pub fn compose<P: ThresholdStorage>(state: &ControllerState<P>, now_ms: u64) -> Frame {
    if let Some(banner) = state.banner(now_ms) {
        return Frame::from_lines(&banner.text, "");
    }

    let mut line = Row::new();

    if state.menu_active() {
        let _ = write!(line, "{}%", state.threshold().percent());
        return Frame::from_lines("Set Threshold:", &line);
    }

    let _ = match state.moisture() {
        Some(m) => write!(line, "Moisture: {}%", m),
        None => write!(line, "Moisture: --%"),
    };

    let action = if state.outputs().relay { "Irrigate" } else { "Idle" };
    let mut status = Row::new();
    let _ = match state.mode() {
        SystemMode::Manual => write!(status, "Status: {}", action),
        SystemMode::Wifi => write!(status, "WiFi: {}", action),
    };

    Frame::from_lines(&line, &status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::ButtonEvents;
    use crate::hal::MockStorage;
    use crate::threshold::ThresholdStore;

    fn state() -> ControllerState<MockStorage> {
        ControllerState::new(ThresholdStore::load(MockStorage::new(), 40), 1500)
    }

    #[test]
    fn rows_are_padded_to_width() {
        let f = Frame::from_lines("ab", "");
        assert_eq!(f.rows[0].len(), 16);
        assert_eq!(f.rows[1].as_str(), "                ");
        assert_eq!(f.line(0), "ab");
        assert_eq!(f.line(7), "");
    }

    #[test]
    fn long_rows_truncated() {
        let f = Frame::from_lines("0123456789abcdefXYZ", "");
        assert_eq!(f.rows[0].as_str(), "0123456789abcdef");
    }

    #[test]
    fn before_first_sample() {
        let f = compose(&state(), 0);
        assert_eq!(f.line(0), "Moisture: --%");
        assert_eq!(f.line(1), "Status: Idle");
    }

    #[test]
    fn normal_manual_screen() {
        let mut s = state();
        s.on_sample(15);
        let f = compose(&s, 0);
        assert_eq!(f.line(0), "Moisture: 15%");
        assert_eq!(f.line(1), "Status: Irrigate");

        s.on_sample(100);
        let f = compose(&s, 0);
        assert_eq!(f.line(0), "Moisture: 100%");
        assert_eq!(f.line(1), "Status: Idle");
    }

    #[test]
    fn normal_wifi_screen() {
        let mut s = state();
        s.toggle_mode(0);
        s.on_status_request(10, 0);
        let f = compose(&s, 5000);
        assert_eq!(f.line(0), "Moisture: 10%");
        assert_eq!(f.line(1), "WiFi: Irrigate");
    }

    #[test]
    fn menu_screen() {
        let mut s = state();
        s.on_sample(50);
        s.on_buttons(ButtonEvents {
            menu: true,
            ..Default::default()
        });
        let f = compose(&s, 0);
        assert_eq!(f.line(0), "Set Threshold:");
        assert_eq!(f.line(1), "40%");
    }

    #[test]
    fn banner_overrides_then_expires() {
        let mut s = state();
        s.on_sample(50);
        s.toggle_mode(1000);
        let f = compose(&s, 1200);
        assert_eq!(f.line(0), "WiFi Mode");
        assert_eq!(f.line(1), "");

        let f = compose(&s, 2500);
        assert_eq!(f.line(0), "Moisture: 50%");
    }

    #[test]
    fn banner_overrides_menu() {
        let mut s = state();
        s.on_buttons(ButtonEvents {
            menu: true,
            ..Default::default()
        });
        s.toggle_mode(0);
        assert_eq!(compose(&s, 0).line(0), "WiFi Mode");
        assert_eq!(compose(&s, 1500).line(0), "Set Threshold:");
    }
}
