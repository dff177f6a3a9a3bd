//! Shared controller state: menu, mode, threshold, and desired outputs.
//!
//! [`ControllerState`] is the single mutable state that both the control
//! loop and the network request handlers act on. Every transition takes
//! `&mut self` and runs to completion; callers serialise access (the
//! controller lives behind one mutex on hosted platforms).
//!
//! # Transitions
//!
//! | Event | Effect |
//! |-------|--------|
//! | Menu button | Toggle `menu_active`, request a display clear |
//! | +/- button (menu open) | Threshold one step up/down |
//! | Sampling tick | Record moisture; buzzer rule always; relay rule in Manual with menu closed |
//! | Status request | Record moisture; buzzer rule always; relay rule in WiFi with menu closed |
//! | Toggle-mode request | Flip [`SystemMode`], clear, show mode banner |
//!
//! There is no terminal state.

use heapless::String as HString;

use crate::actuator::{evaluate, ActuatorOutputs, Decision, SystemMode};
use crate::debounce::ButtonEvents;
use crate::threshold::{Step, Threshold, ThresholdStore};
use crate::traits::{ThresholdStorage, DISPLAY_COLS};

/// Default banner lifetime in milliseconds.
pub const DEFAULT_BANNER_MS: u64 = 1500;

/// Text of a banner, one display row.
pub type BannerText = HString<{ DISPLAY_COLS as usize }>;

/// Transient full-screen message with an expiry time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    /// Message, truncated to one row.
    pub text: BannerText,
    /// Time at which the banner stops showing.
    pub expires_ms: u64,
}

impl Banner {
    /// Creates a banner. Text longer than a row is cut at a char boundary.
    pub fn new(text: &str, expires_ms: u64) -> Self {
        let mut out = BannerText::new();
        for c in text.chars() {
            if out.push(c).is_err() {
                break;
            }
        }
        Self {
            text: out,
            expires_ms,
        }
    }

    /// Returns true while the banner should be displayed.
    #[inline]
    pub fn is_active(&self, now_ms: u64) -> bool {
        now_ms < self.expires_ms
    }
}

/// What a set of button events did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonOutcome {
    /// The menu opened or closed.
    pub menu_toggled: bool,
    /// The threshold changed.
    pub threshold_changed: bool,
}

/// Mutable irrigation state.
#[derive(Debug)]
pub struct ControllerState<P: ThresholdStorage> {
    threshold: ThresholdStore<P>,
    menu_active: bool,
    mode: SystemMode,
    moisture: Option<u8>,
    outputs: ActuatorOutputs,
    banner: Option<Banner>,
    clear_pending: bool,
    banner_ms: u64,
    /// Last status poll, or the switch into WiFi mode.
    remote_seen_ms: u64,
    remote_stale_reported: bool,
}

impl<P: ThresholdStorage> ControllerState<P> {
    /// Creates the start-up state: menu closed, Manual mode, outputs off.
    pub fn new(threshold: ThresholdStore<P>, banner_ms: u64) -> Self {
        Self {
            threshold,
            menu_active: false,
            mode: SystemMode::Manual,
            moisture: None,
            outputs: ActuatorOutputs::default(),
            banner: None,
            clear_pending: true,
            banner_ms,
            remote_seen_ms: 0,
            remote_stale_reported: false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current threshold.
    #[inline]
    pub fn threshold(&self) -> Threshold {
        self.threshold.get()
    }

    /// The threshold store (for inspecting the backend).
    pub fn threshold_store(&self) -> &ThresholdStore<P> {
        &self.threshold
    }

    /// Mutable access to the threshold store.
    pub fn threshold_store_mut(&mut self) -> &mut ThresholdStore<P> {
        &mut self.threshold
    }

    /// Whether the threshold menu is open.
    #[inline]
    pub fn menu_active(&self) -> bool {
        self.menu_active
    }

    /// Current system mode.
    #[inline]
    pub fn mode(&self) -> SystemMode {
        self.mode
    }

    /// Last recorded moisture, `None` before the first sample.
    #[inline]
    pub fn moisture(&self) -> Option<u8> {
        self.moisture
    }

    /// Output levels the rules currently call for.
    #[inline]
    pub fn outputs(&self) -> ActuatorOutputs {
        self.outputs
    }

    /// The banner, if one is showing at `now_ms`.
    pub fn banner(&self, now_ms: u64) -> Option<&Banner> {
        self.banner.as_ref().filter(|b| b.is_active(now_ms))
    }

    /// Returns and resets the clear-display request.
    pub fn take_clear(&mut self) -> bool {
        core::mem::take(&mut self.clear_pending)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Applies debounced button events.
    ///
    /// The menu toggle is handled first, so a +/- event arriving in the same
    /// poll as the press that opens the menu already adjusts the threshold.
    pub fn on_buttons(&mut self, events: ButtonEvents) -> ButtonOutcome {
        let mut outcome = ButtonOutcome::default();

        if events.menu {
            self.menu_active = !self.menu_active;
            self.clear_pending = true;
            outcome.menu_toggled = true;
            log::info!("menu {}", if self.menu_active { "opened" } else { "closed" });
        }

        if self.menu_active {
            if events.increase {
                outcome.threshold_changed |= self.threshold.adjust(Step::Up);
            }
            if events.decrease {
                outcome.threshold_changed |= self.threshold.adjust(Step::Down);
            }
        }

        outcome
    }

    /// Records a periodic sample and applies the local rules.
    ///
    /// The buzzer always follows the critical-moisture rule. The relay follows
    /// the threshold only in Manual mode with the menu closed.
    pub fn on_sample(&mut self, moisture: u8) -> Decision {
        let decision = self.record(moisture);
        if self.mode == SystemMode::Manual && !self.menu_active {
            self.outputs.relay = decision.outputs.relay;
        }
        decision
    }

    /// Records a status-request sample and applies the remote rules.
    ///
    /// The buzzer always follows the critical-moisture rule. The relay follows
    /// the threshold only in WiFi mode with the menu closed.
    pub fn on_status_request(&mut self, moisture: u8, now_ms: u64) -> Decision {
        let decision = self.record(moisture);
        if self.mode == SystemMode::Wifi && !self.menu_active {
            self.outputs.relay = decision.outputs.relay;
        }
        self.remote_seen_ms = now_ms;
        self.remote_stale_reported = false;
        decision
    }

    fn record(&mut self, moisture: u8) -> Decision {
        self.moisture = Some(moisture);
        let decision = evaluate(moisture, self.threshold.get(), self.mode);
        self.outputs.buzzer = decision.outputs.buzzer;
        decision
    }

    /// Sets the threshold (clamped). Returns `true` if it changed.
    pub fn set_threshold(&mut self, value: i32) -> bool {
        self.threshold.set(value)
    }

    /// Steps the threshold. Returns `true` if it changed.
    pub fn adjust_threshold(&mut self, step: Step) -> bool {
        self.threshold.adjust(step)
    }

    /// Flips between Manual and WiFi mode and shows the new mode's name.
    ///
    /// The relay keeps its current level until the next sample (Manual) or
    /// status request (WiFi).
    pub fn toggle_mode(&mut self, now_ms: u64) -> SystemMode {
        self.mode = self.mode.toggled();
        self.clear_pending = true;
        self.banner = Some(Banner::new(self.mode.banner(), now_ms + self.banner_ms));
        self.remote_seen_ms = now_ms;
        self.remote_stale_reported = false;
        log::info!("mode -> {}", self.mode.name());
        self.mode
    }

    /// Shows `text` for `duration_ms`, replacing any current banner.
    pub fn show_banner(&mut self, text: &str, now_ms: u64, duration_ms: u64) {
        self.clear_pending = true;
        self.banner = Some(Banner::new(text, now_ms + duration_ms));
    }

    /// Drops an expired banner. Returns `true` if one was removed.
    pub fn expire_banner(&mut self, now_ms: u64) -> bool {
        match &self.banner {
            Some(b) if !b.is_active(now_ms) => {
                self.banner = None;
                self.clear_pending = true;
                true
            }
            _ => false,
        }
    }

    /// Returns `true` once when WiFi mode has gone `limit_ms` without a
    /// status request. Re-arms on the next request or mode switch.
    ///
    /// Detection only: the relay keeps its last level.
    pub fn check_remote_stale(&mut self, now_ms: u64, limit_ms: u64) -> bool {
        if self.mode != SystemMode::Wifi || self.remote_stale_reported {
            return false;
        }
        if now_ms.saturating_sub(self.remote_seen_ms) >= limit_ms {
            self.remote_stale_reported = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockStorage;

    fn state() -> ControllerState<MockStorage> {
        ControllerState::new(ThresholdStore::load(MockStorage::new(), 40), DEFAULT_BANNER_MS)
    }

    fn menu() -> ButtonEvents {
        ButtonEvents {
            menu: true,
            ..Default::default()
        }
    }

    fn plus() -> ButtonEvents {
        ButtonEvents {
            increase: true,
            ..Default::default()
        }
    }

    fn minus() -> ButtonEvents {
        ButtonEvents {
            decrease: true,
            ..Default::default()
        }
    }

    #[test]
    fn startup_state() {
        let mut s = state();
        assert!(!s.menu_active());
        assert_eq!(s.mode(), SystemMode::Manual);
        assert_eq!(s.moisture(), None);
        assert_eq!(s.outputs(), ActuatorOutputs::default());
        assert_eq!(s.threshold().percent(), 40);
        assert!(s.take_clear());
        assert!(!s.take_clear());
    }

    // =========================================================================
    // Menu
    // =========================================================================

    #[test]
    fn menu_button_toggles_and_clears() {
        let mut s = state();
        s.take_clear();

        let out = s.on_buttons(menu());
        assert!(out.menu_toggled);
        assert!(s.menu_active());
        assert!(s.take_clear());

        s.on_buttons(menu());
        assert!(!s.menu_active());
        assert!(s.take_clear());
    }

    #[test]
    fn plus_minus_ignored_outside_menu() {
        let mut s = state();
        let out = s.on_buttons(plus());
        assert!(!out.threshold_changed);
        s.on_buttons(minus());
        assert_eq!(s.threshold().percent(), 40);
    }

    #[test]
    fn plus_minus_adjust_in_menu() {
        let mut s = state();
        s.on_buttons(menu());
        assert!(s.on_buttons(plus()).threshold_changed);
        s.on_buttons(plus());
        assert_eq!(s.threshold().percent(), 42);
        s.on_buttons(minus());
        assert_eq!(s.threshold().percent(), 41);
        assert_eq!(s.threshold_store().storage().stored(), Some(41));
    }

    #[test]
    fn menu_adjust_clamps() {
        let mut s = state();
        s.set_threshold(100);
        s.on_buttons(menu());
        assert!(!s.on_buttons(plus()).threshold_changed);
        assert_eq!(s.threshold().percent(), 100);

        s.set_threshold(0);
        assert!(!s.on_buttons(minus()).threshold_changed);
        assert_eq!(s.threshold().percent(), 0);
    }

    #[test]
    fn no_relay_change_while_menu_open() {
        let mut s = state();
        s.on_sample(10);
        assert!(s.outputs().relay);

        s.on_buttons(menu());
        s.on_sample(90);
        assert!(s.outputs().relay);

        // WiFi status requests are gated too
        s.toggle_mode(0);
        s.on_status_request(90, 0);
        assert!(s.outputs().relay);

        s.on_buttons(menu());
        s.on_status_request(90, 0);
        assert!(!s.outputs().relay);
    }

    // =========================================================================
    // Sampling and status
    // =========================================================================

    #[test]
    fn manual_sample_drives_relay_and_buzzer() {
        let mut s = state();
        let d = s.on_sample(15);
        assert_eq!(d.status.label(), "Irrigating (Manual)");
        assert_eq!(
            s.outputs(),
            ActuatorOutputs {
                relay: true,
                buzzer: true
            }
        );
        assert_eq!(s.moisture(), Some(15));
    }

    #[test]
    fn wifi_sample_leaves_relay_alone() {
        let mut s = state();
        s.toggle_mode(0);
        s.on_sample(10);
        assert!(!s.outputs().relay);
        assert!(s.outputs().buzzer);
    }

    #[test]
    fn wifi_status_request_drives_relay() {
        let mut s = state();
        s.toggle_mode(0);
        let d = s.on_status_request(10, 100);
        assert!(d.outputs.relay);
        assert!(s.outputs().relay);

        let d = s.on_status_request(50, 200);
        assert_eq!(d.status.label(), "Idle (WiFi)");
        assert!(!s.outputs().relay);
    }

    #[test]
    fn manual_status_request_leaves_relay_alone() {
        let mut s = state();
        s.on_status_request(10, 0);
        assert!(!s.outputs().relay);
        assert!(s.outputs().buzzer);
    }

    #[test]
    fn buzzer_follows_moisture_in_every_state() {
        let mut s = state();
        for toggle_menu in [false, true] {
            for to_wifi in [false, true] {
                if toggle_menu != s.menu_active() {
                    s.on_buttons(menu());
                }
                if to_wifi != (s.mode() == SystemMode::Wifi) {
                    s.toggle_mode(0);
                }
                for m in [0u8, 19, 20, 55, 100] {
                    s.on_sample(m);
                    assert_eq!(s.outputs().buzzer, m < 20);
                    s.on_status_request(m, 0);
                    assert_eq!(s.outputs().buzzer, m < 20);
                }
            }
        }
    }

    // =========================================================================
    // Mode and banner
    // =========================================================================

    #[test]
    fn double_toggle_restores_mode() {
        let mut s = state();
        assert_eq!(s.toggle_mode(0), SystemMode::Wifi);
        assert_eq!(s.toggle_mode(10), SystemMode::Manual);
        assert_eq!(s.mode(), SystemMode::Manual);
    }

    #[test]
    fn toggle_sets_expiring_banner() {
        let mut s = state();
        s.take_clear();
        s.toggle_mode(1000);
        assert!(s.take_clear());
        assert_eq!(s.banner(1000).map(|b| b.text.as_str()), Some("WiFi Mode"));
        assert!(s.banner(2499).is_some());
        assert!(s.banner(2500).is_none());

        assert!(!s.expire_banner(2499));
        assert!(s.expire_banner(2500));
        assert!(s.take_clear());
        assert!(!s.expire_banner(3000));
    }

    #[test]
    fn banner_text_truncated_to_row() {
        let b = Banner::new("A very long device name indeed", 0);
        assert_eq!(b.text.len(), 16);
        assert_eq!(b.text.as_str(), "A very long devi");
    }

    #[test]
    fn remote_stale_reported_once() {
        let mut s = state();
        assert!(!s.check_remote_stale(100_000, 30_000));

        s.toggle_mode(0);
        assert!(!s.check_remote_stale(29_999, 30_000));
        assert!(s.check_remote_stale(30_000, 30_000));
        assert!(!s.check_remote_stale(60_000, 30_000));

        s.on_status_request(50, 60_000);
        assert!(!s.check_remote_stale(89_999, 30_000));
        assert!(s.check_remote_stale(90_000, 30_000));
    }
}
