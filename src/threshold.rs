//! Moisture threshold with clamping and persistence.
//!
//! [`Threshold`] is the validated value (0–100). [`ThresholdStore`] owns the
//! current value and writes it through a [`ThresholdStorage`] backend on
//! every change. Storage failures are logged and never surface: the
//! in-memory value stays authoritative.
//!
//! # Example
//!
//! ```rust
//! use rs_irrigation::threshold::{Step, ThresholdStore};
//! use rs_irrigation::hal::MockStorage;
//!
//! let mut store = ThresholdStore::load(MockStorage::new(), 40);
//! assert_eq!(store.get().percent(), 40);
//!
//! store.adjust(Step::Up);
//! assert_eq!(store.get().percent(), 41);
//!
//! store.set(250);
//! assert_eq!(store.get().percent(), 100);
//! assert_eq!(store.storage().stored(), Some(100));
//! ```

use crate::traits::ThresholdStorage;

/// Default threshold when nothing is stored.
pub const DEFAULT_THRESHOLD_PERCENT: u8 = 40;

/// Upper bound of the threshold range.
pub const MAX_THRESHOLD_PERCENT: u8 = 100;

/// A moisture threshold in percent, always within `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Threshold(u8);

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD_PERCENT)
    }
}

impl Threshold {
    /// Creates a threshold, clamping to `[0, 100]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_irrigation::threshold::Threshold;
    ///
    /// assert_eq!(Threshold::clamped(-5).percent(), 0);
    /// assert_eq!(Threshold::clamped(55).percent(), 55);
    /// assert_eq!(Threshold::clamped(101).percent(), 100);
    /// ```
    pub fn clamped(value: i32) -> Self {
        // clamp guarantees the cast is lossless
        Self(value.clamp(0, i32::from(MAX_THRESHOLD_PERCENT)) as u8)
    }

    /// Validating constructor. Returns `None` above 100.
    pub const fn new(value: u8) -> Option<Self> {
        if value <= MAX_THRESHOLD_PERCENT {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Percent value.
    #[inline]
    pub const fn percent(self) -> u8 {
        self.0
    }

    /// One step up or down, saturating at the range ends.
    pub fn stepped(self, step: Step) -> Self {
        match step {
            Step::Up => Self(self.0.saturating_add(1).min(MAX_THRESHOLD_PERCENT)),
            Step::Down => Self(self.0.saturating_sub(1)),
        }
    }
}

impl core::fmt::Display for Threshold {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Direction of a single threshold adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Increase by one percent.
    Up,
    /// Decrease by one percent.
    Down,
}

/// Owns the threshold and its persistence backend.
#[derive(Debug)]
pub struct ThresholdStore<P: ThresholdStorage> {
    current: Threshold,
    storage: P,
}

impl<P: ThresholdStorage> ThresholdStore<P> {
    /// Loads the persisted threshold, falling back to `default_percent`.
    ///
    /// A stored value above 100 (corrupt or from another firmware) is
    /// clamped. A read error is logged and the default is used.
    pub fn load(mut storage: P, default_percent: u8) -> Self {
        let fallback = Threshold::clamped(i32::from(default_percent));
        let current = match storage.load() {
            Ok(Some(stored)) => Threshold::clamped(i32::from(stored)),
            Ok(None) => {
                log::info!("no stored threshold, using default {}", fallback);
                fallback
            }
            Err(e) => {
                log::warn!("threshold load failed: {:?}; using default {}", e, fallback);
                fallback
            }
        };
        Self { current, storage }
    }

    /// Current threshold.
    #[inline]
    pub fn get(&self) -> Threshold {
        self.current
    }

    /// Sets the threshold from an unbounded integer, clamping to `[0, 100]`.
    ///
    /// Returns `true` if the value changed (and a write was attempted).
    pub fn set(&mut self, value: i32) -> bool {
        self.replace(Threshold::clamped(value))
    }

    /// Moves the threshold one step. Returns `true` if it changed.
    pub fn adjust(&mut self, step: Step) -> bool {
        self.replace(self.current.stepped(step))
    }

    fn replace(&mut self, next: Threshold) -> bool {
        if next == self.current {
            return false;
        }
        self.current = next;
        if let Err(e) = self.storage.save(next.percent()) {
            log::warn!("threshold save failed: {:?}", e);
        }
        log::debug!("threshold now {}", next);
        true
    }

    /// The storage backend.
    pub fn storage(&self) -> &P {
        &self.storage
    }

    /// Mutable access to the storage backend.
    pub fn storage_mut(&mut self) -> &mut P {
        &mut self.storage
    }
}
