//! Soil-moisture sensor reading and calibration.
//!
//! The sensor delivers a raw ADC count. [`Calibration`] maps that count
//! linearly onto a 0–100 moisture percentage; [`SensorReader`] pairs a
//! calibration with an [`AnalogInput`].
//!
//! Single sample, no averaging: callers see sensor noise as-is.
//!
//! # Example
//!
//! ```rust
//! use rs_irrigation::sensor::{Calibration, Polarity};
//!
//! let direct = Calibration::new(0, 4095, Polarity::Direct);
//! assert_eq!(direct.to_percent(0), 0);
//! assert_eq!(direct.to_percent(4095), 100);
//!
//! // Capacitive probes usually read high when dry
//! let dry_high = Calibration::new(0, 4095, Polarity::Inverted);
//! assert_eq!(dry_high.to_percent(4095), 0);
//! ```

use crate::traits::AnalogInput;

/// Direction of the raw-to-percent mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Polarity {
    /// Higher raw value means wetter soil (`raw_max` → 100%).
    #[default]
    Direct,
    /// Higher raw value means drier soil (`raw_max` → 0%).
    Inverted,
}

impl Polarity {
    /// Parse polarity from text (`"direct"` / `"inverted"`, case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_irrigation::sensor::Polarity;
    ///
    /// assert_eq!(Polarity::from_text("Inverted"), Some(Polarity::Inverted));
    /// assert_eq!(Polarity::from_text("dry-high"), Some(Polarity::Inverted));
    /// assert_eq!(Polarity::from_text("sideways"), None);
    /// ```
    pub fn from_text(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("direct") || s.eq_ignore_ascii_case("wet-high") {
            Some(Polarity::Direct)
        } else if s.eq_ignore_ascii_case("inverted") || s.eq_ignore_ascii_case("dry-high") {
            Some(Polarity::Inverted)
        } else {
            None
        }
    }
}

/// Linear calibration from raw ADC counts to moisture percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Calibration {
    raw_min: u16,
    raw_max: u16,
    polarity: Polarity,
}

impl Default for Calibration {
    /// Full 12-bit range, direct polarity.
    fn default() -> Self {
        Self::new(0, 4095, Polarity::Direct)
    }
}

impl Calibration {
    /// Creates a calibration. Bounds given in the wrong order are swapped.
    pub const fn new(raw_min: u16, raw_max: u16, polarity: Polarity) -> Self {
        if raw_min <= raw_max {
            Self {
                raw_min,
                raw_max,
                polarity,
            }
        } else {
            Self {
                raw_min: raw_max,
                raw_max: raw_min,
                polarity,
            }
        }
    }

    /// Lower raw bound.
    #[inline]
    pub const fn raw_min(&self) -> u16 {
        self.raw_min
    }

    /// Upper raw bound.
    #[inline]
    pub const fn raw_max(&self) -> u16 {
        self.raw_max
    }

    /// Mapping direction.
    #[inline]
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Maps a raw sample to a percentage in `[0, 100]`.
    ///
    /// Values outside `[raw_min, raw_max]` are clamped first. Integer
    /// truncation matches the firmware's `map()` arithmetic.
    pub fn to_percent(&self, raw: u16) -> u8 {
        let span = u32::from(self.raw_max - self.raw_min);
        let scaled = if span == 0 {
            0
        } else {
            let offset = u32::from(raw.clamp(self.raw_min, self.raw_max) - self.raw_min);
            offset * 100 / span
        };
        // scaled <= 100 by construction
        let scaled = scaled as u8;
        match self.polarity {
            Polarity::Direct => scaled,
            Polarity::Inverted => 100 - scaled,
        }
    }
}

/// Reads moisture percent from an analog input.
///
/// # Example
///
/// ```rust
/// use rs_irrigation::sensor::{Calibration, SensorReader};
/// use rs_irrigation::hal::MockSensor;
///
/// let mut sensor = MockSensor::new(2048);
/// let reader = SensorReader::new(Calibration::default());
/// assert_eq!(reader.read_percent(&mut sensor), 50);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SensorReader {
    calibration: Calibration,
}

impl SensorReader {
    /// Creates a reader with the given calibration.
    pub fn new(calibration: Calibration) -> Self {
        Self { calibration }
    }

    /// Takes one sample and converts it.
    pub fn read_percent<A: AnalogInput>(&self, input: &mut A) -> u8 {
        let raw = input.read_raw();
        let percent = self.calibration.to_percent(raw);
        log::trace!("moisture raw={} pct={}", raw, percent);
        percent
    }

    /// The active calibration.
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_endpoints_and_midpoint() {
        let cal = Calibration::default();
        assert_eq!(cal.to_percent(0), 0);
        assert_eq!(cal.to_percent(4095), 100);
        // 2048 * 100 / 4095 = 50.01 -> 50
        assert_eq!(cal.to_percent(2048), 50);
        // 819 * 100 / 4095 = 20.0 -> 20
        assert_eq!(cal.to_percent(819), 20);
        assert_eq!(cal.to_percent(818), 19);
    }

    #[test]
    fn inverted_endpoints() {
        let cal = Calibration::new(0, 4095, Polarity::Inverted);
        assert_eq!(cal.to_percent(0), 100);
        assert_eq!(cal.to_percent(4095), 0);
    }

    #[test]
    fn out_of_range_is_clamped() {
        let cal = Calibration::new(1000, 3000, Polarity::Direct);
        assert_eq!(cal.to_percent(0), 0);
        assert_eq!(cal.to_percent(999), 0);
        assert_eq!(cal.to_percent(3001), 100);
        assert_eq!(cal.to_percent(u16::MAX), 100);
        assert_eq!(cal.to_percent(2000), 50);
    }

    #[test]
    fn swapped_bounds() {
        let cal = Calibration::new(3000, 1000, Polarity::Direct);
        assert_eq!(cal.raw_min(), 1000);
        assert_eq!(cal.raw_max(), 3000);
    }

    #[test]
    fn degenerate_span() {
        let direct = Calibration::new(500, 500, Polarity::Direct);
        assert_eq!(direct.to_percent(0), 0);
        assert_eq!(direct.to_percent(500), 0);
        assert_eq!(direct.to_percent(4095), 0);

        let inverted = Calibration::new(500, 500, Polarity::Inverted);
        assert_eq!(inverted.to_percent(4095), 100);
    }

    #[test]
    fn bounded_and_monotonic_over_full_domain() {
        for polarity in [Polarity::Direct, Polarity::Inverted] {
            let cal = Calibration::new(300, 3900, polarity);
            let mut prev = cal.to_percent(0);
            for raw in 1..=u16::MAX {
                let pct = cal.to_percent(raw);
                assert!(pct <= 100);
                match polarity {
                    Polarity::Direct => assert!(pct >= prev, "raw {raw}"),
                    Polarity::Inverted => assert!(pct <= prev, "raw {raw}"),
                }
                prev = pct;
            }
        }
    }

    #[test]
    fn polarity_from_text() {
        assert_eq!(Polarity::from_text("direct"), Some(Polarity::Direct));
        assert_eq!(Polarity::from_text(" DIRECT "), Some(Polarity::Direct));
        assert_eq!(Polarity::from_text("wet-high"), Some(Polarity::Direct));
        assert_eq!(Polarity::from_text("inverted"), Some(Polarity::Inverted));
        assert_eq!(Polarity::from_text(""), None);
    }
}
