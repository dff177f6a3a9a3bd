//! Button debouncing and auto-repeat.
//!
//! Two temporal contracts live here:
//!
//! - **Edge**: [`DebouncedButton`] reports a press once the raw level has been
//!   asserted continuously for the debounce window. Used for the menu toggle.
//! - **Repeat**: [`RepeatButton`] adds a cadence gate on top, firing on the
//!   press edge and then once per repeat interval while the button stays
//!   held. Used for threshold increase/decrease.
//!
//! [`Debouncer`] bundles one of each per physical button and turns raw
//! [`ButtonLevels`] into [`ButtonEvents`].
//!
//! # Example
//!
//! ```rust
//! use rs_irrigation::debounce::DebouncedButton;
//!
//! let mut button = DebouncedButton::new(50);
//! assert!(!button.update(true, 0));  // pending
//! assert!(!button.update(true, 30)); // still inside the window
//! assert!(button.update(true, 50));  // stable for 50ms: press edge
//! assert!(!button.update(true, 80)); // held, no new edge
//! ```

use crate::traits::ButtonLevels;

/// Default debounce window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 50;

/// Default auto-repeat interval in milliseconds.
pub const DEFAULT_REPEAT_MS: u64 = 200;

/// Debounce phase of one button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ButtonPhase {
    /// Not asserted.
    #[default]
    Released,
    /// Asserted but not yet stable for the full window.
    PressPending {
        /// Time of the last raw transition to asserted.
        since_ms: u64,
    },
    /// Asserted and stable; the press edge has been reported.
    Pressed,
}

/// Single button with press-edge debouncing.
#[derive(Clone, Copy, Debug)]
pub struct DebouncedButton {
    phase: ButtonPhase,
    window_ms: u64,
}

impl DebouncedButton {
    /// Creates a released button with the given debounce window.
    pub const fn new(window_ms: u64) -> Self {
        Self {
            phase: ButtonPhase::Released,
            window_ms,
        }
    }

    /// Feeds one raw sample. Returns `true` exactly on the debounced press edge.
    ///
    /// Any deassertion returns the button to [`ButtonPhase::Released`], so
    /// bounces shorter than the window never produce an edge.
    pub fn update(&mut self, asserted: bool, now_ms: u64) -> bool {
        if !asserted {
            self.phase = ButtonPhase::Released;
            return false;
        }

        match self.phase {
            ButtonPhase::Released => {
                self.phase = ButtonPhase::PressPending { since_ms: now_ms };
                self.settle(now_ms, now_ms)
            }
            ButtonPhase::PressPending { since_ms } => self.settle(since_ms, now_ms),
            ButtonPhase::Pressed => false,
        }
    }

    fn settle(&mut self, since_ms: u64, now_ms: u64) -> bool {
        if now_ms.saturating_sub(since_ms) >= self.window_ms {
            self.phase = ButtonPhase::Pressed;
            true
        } else {
            false
        }
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> ButtonPhase {
        self.phase
    }

    /// Returns true while the button is debounced-pressed.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.phase == ButtonPhase::Pressed
    }
}

/// Button with debounced press edge plus held-down auto-repeat.
///
/// # Example
///
/// ```rust
/// use rs_irrigation::debounce::RepeatButton;
///
/// let mut plus = RepeatButton::new(50, 200);
/// assert!(!plus.update(true, 0));
/// assert!(plus.update(true, 50));   // press edge
/// assert!(!plus.update(true, 150));
/// assert!(plus.update(true, 250));  // first repeat
/// assert!(plus.update(true, 450));  // second repeat
/// ```
#[derive(Clone, Copy, Debug)]
pub struct RepeatButton {
    button: DebouncedButton,
    repeat_ms: u64,
    last_fire_ms: Option<u64>,
}

impl RepeatButton {
    /// Creates a released button.
    pub const fn new(window_ms: u64, repeat_ms: u64) -> Self {
        Self {
            button: DebouncedButton::new(window_ms),
            repeat_ms,
            last_fire_ms: None,
        }
    }

    /// Feeds one raw sample. Returns `true` when the button should act.
    pub fn update(&mut self, asserted: bool, now_ms: u64) -> bool {
        if self.button.update(asserted, now_ms) {
            self.last_fire_ms = Some(now_ms);
            return true;
        }

        if !self.button.is_pressed() {
            self.last_fire_ms = None;
            return false;
        }

        match self.last_fire_ms {
            Some(last) if now_ms.saturating_sub(last) < self.repeat_ms => false,
            _ => {
                self.last_fire_ms = Some(now_ms);
                true
            }
        }
    }

    /// Restarts the repeat cadence at `now_ms` if the button is held.
    ///
    /// The next fire is then a full repeat interval away.
    pub fn rearm(&mut self, now_ms: u64) {
        if self.button.is_pressed() {
            self.last_fire_ms = Some(now_ms);
        }
    }

    /// Returns true while the button is debounced-pressed.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.button.is_pressed()
    }
}

/// Debounced events produced by one [`Debouncer::poll`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonEvents {
    /// Menu button press edge.
    pub menu: bool,
    /// Increase fired (edge or repeat).
    pub increase: bool,
    /// Decrease fired (edge or repeat).
    pub decrease: bool,
}

impl ButtonEvents {
    /// Returns true if any event fired.
    #[inline]
    pub fn any(&self) -> bool {
        self.menu || self.increase || self.decrease
    }
}

/// Debouncer for the menu / increase / decrease button set.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    menu: DebouncedButton,
    increase: RepeatButton,
    decrease: RepeatButton,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS, DEFAULT_REPEAT_MS)
    }
}

impl Debouncer {
    /// Creates a debouncer with the given window and repeat interval.
    pub const fn new(window_ms: u64, repeat_ms: u64) -> Self {
        Self {
            menu: DebouncedButton::new(window_ms),
            increase: RepeatButton::new(window_ms, repeat_ms),
            decrease: RepeatButton::new(window_ms, repeat_ms),
        }
    }

    /// Feeds one set of raw levels and returns the resulting events.
    pub fn poll(&mut self, levels: ButtonLevels, now_ms: u64) -> ButtonEvents {
        ButtonEvents {
            menu: self.menu.update(levels.menu, now_ms),
            increase: self.increase.update(levels.increase, now_ms),
            decrease: self.decrease.update(levels.decrease, now_ms),
        }
    }

    /// Restarts the +/- repeat cadence, e.g. after the menu toggles.
    pub fn rearm(&mut self, now_ms: u64) {
        self.increase.rearm(now_ms);
        self.decrease.rearm(now_ms);
    }
}
