//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for all hardware traits, enabling
//! development and testing on desktop without physical hardware.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockSensor`] | [`AnalogInput`] | Settable raw ADC value |
//! | [`MockPin`] | [`DigitalOutput`] | Tracks level and write count |
//! | [`MockButtons`] | [`ButtonInput`] | Settable raw button levels |
//! | [`MockDisplay`] | [`CharDisplay`] | 2×16 character grid |
//! | [`MockStorage`] | [`ThresholdStorage`] | In-memory threshold with failure injection |
//! | [`MockClock`] | [`Clock`] | Controllable time source |
//! | [`MockBoard`] | [`Board`] | Bundles the mocks above |
//!
//! # Example
//!
//! ```rust
//! use rs_irrigation::{Config, IrrigationController};
//! use rs_irrigation::hal::{MockBoard, MockStorage};
//!
//! let mut controller =
//!     IrrigationController::new(MockBoard::hardware(), MockStorage::new(), &Config::default());
//! controller.start(0);
//! controller.tick(0);
//!
//! // Verify via the mocks
//! assert_eq!(controller.hardware().relay.writes, 1);
//! ```

extern crate alloc;
use alloc::string::String;

use crate::traits::{
    AnalogInput, Board, ButtonInput, ButtonLevels, CharDisplay, Clock, DigitalOutput, Hardware,
    ThresholdStorage, DISPLAY_COLS, DISPLAY_ROWS,
};

// ============================================================================
// Hardware Mocks
// ============================================================================

/// Mock moisture sensor returning a settable raw value.
#[derive(Debug, Clone, Copy)]
pub struct MockSensor {
    /// Value returned by `read_raw`.
    pub raw: u16,
    /// Number of reads.
    pub reads: usize,
}

impl MockSensor {
    /// Creates a sensor that reads `raw`.
    pub fn new(raw: u16) -> Self {
        Self { raw, reads: 0 }
    }
}

impl Default for MockSensor {
    /// Mid-scale reading.
    fn default() -> Self {
        Self::new(2048)
    }
}

impl AnalogInput for MockSensor {
    fn read_raw(&mut self) -> u16 {
        self.reads += 1;
        self.raw
    }
}

/// Mock digital output.
///
/// # Example
///
/// ```rust
/// use rs_irrigation::hal::MockPin;
/// use rs_irrigation::traits::DigitalOutput;
///
/// let mut pin = MockPin::new();
/// pin.set_level(true).unwrap();
/// assert!(pin.level);
/// assert_eq!(pin.writes, 1);
///
/// pin.fail = true;
/// assert!(pin.set_level(false).is_err());
/// assert!(pin.level); // unchanged
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct MockPin {
    /// Current level.
    pub level: bool,
    /// Number of successful writes.
    pub writes: usize,
    /// When set, writes fail and leave the level unchanged.
    pub fail: bool,
}

impl MockPin {
    /// Creates a low pin.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DigitalOutput for MockPin {
    type Error = ();

    fn set_level(&mut self, high: bool) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.level = high;
        self.writes += 1;
        Ok(())
    }
}

/// Mock button set with directly settable levels.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockButtons {
    /// Levels returned by `read_levels` (`true` = held).
    pub levels: ButtonLevels,
}

impl MockButtons {
    /// Creates a button set with everything released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds or releases the menu button.
    pub fn set_menu(&mut self, held: bool) {
        self.levels.menu = held;
    }

    /// Holds or releases the increase button.
    pub fn set_increase(&mut self, held: bool) {
        self.levels.increase = held;
    }

    /// Holds or releases the decrease button.
    pub fn set_decrease(&mut self, held: bool) {
        self.levels.decrease = held;
    }

    /// Releases everything.
    pub fn release_all(&mut self) {
        self.levels = ButtonLevels::RELEASED;
    }
}

impl ButtonInput for MockButtons {
    fn read_levels(&mut self) -> ButtonLevels {
        self.levels
    }
}

const ROWS: usize = DISPLAY_ROWS as usize;
const COLS: usize = DISPLAY_COLS as usize;

/// Mock character display holding a 2×16 cell grid.
///
/// # Example
///
/// ```rust
/// use rs_irrigation::hal::MockDisplay;
/// use rs_irrigation::traits::CharDisplay;
///
/// let mut display = MockDisplay::new();
/// display.init().unwrap();
/// display.write_at(1, 4, "hello").unwrap();
/// assert_eq!(display.line(1), "    hello");
/// ```
#[derive(Debug, Clone)]
pub struct MockDisplay {
    cells: [[char; COLS]; ROWS],
    /// Whether init() was called.
    pub initialized: bool,
    /// Number of write_at() calls.
    pub writes: usize,
    /// Number of clear() calls.
    pub clears: usize,
    /// When set, every operation fails.
    pub fail: bool,
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self {
            cells: [[' '; COLS]; ROWS],
            initialized: false,
            writes: 0,
            clears: 0,
            fail: false,
        }
    }
}

impl MockDisplay {
    /// Creates a blank display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Row contents with trailing spaces removed. Out-of-range rows are empty.
    pub fn line(&self, row: usize) -> String {
        match self.cells.get(row) {
            Some(cells) => {
                let s: String = cells.iter().collect();
                String::from(s.trim_end())
            }
            None => String::new(),
        }
    }
}

impl CharDisplay for MockDisplay {
    type Error = ();

    fn init(&mut self) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.initialized = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.cells = [[' '; COLS]; ROWS];
        self.clears += 1;
        Ok(())
    }

    fn write_at(&mut self, row: u8, col: u8, text: &str) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.writes += 1;
        if let Some(cells) = self.cells.get_mut(usize::from(row)) {
            for (cell, c) in cells.iter_mut().skip(usize::from(col)).zip(text.chars()) {
                *cell = c;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Storage Mock
// ============================================================================

/// In-memory threshold storage.
///
/// # Example
///
/// ```rust
/// use rs_irrigation::hal::MockStorage;
/// use rs_irrigation::traits::ThresholdStorage;
///
/// let mut storage = MockStorage::new();
/// assert_eq!(storage.load().unwrap(), None);
///
/// storage.save(55).unwrap();
/// assert_eq!(storage.stored(), Some(55));
/// assert_eq!(storage.save_count(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MockStorage {
    value: Option<u8>,
    saves: usize,
    /// When set, load and save fail without touching the stored value.
    pub fail: bool,
}

impl MockStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage already holding `value`.
    pub fn with_value(value: u8) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    /// The stored value.
    pub fn stored(&self) -> Option<u8> {
        self.value
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ThresholdStorage for MockStorage {
    type Error = ();

    fn load(&mut self) -> Result<Option<u8>, ()> {
        if self.fail {
            return Err(());
        }
        Ok(self.value)
    }

    fn save(&mut self, value: u8) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.value = Some(value);
        self.saves += 1;
        Ok(())
    }
}

// ============================================================================
// Clock Mock
// ============================================================================

/// Mock clock for deterministic time control.
///
/// # Example
///
/// ```rust
/// use rs_irrigation::hal::MockClock;
/// use rs_irrigation::traits::Clock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.set(1000);
/// assert_eq!(clock.now_ms(), 1000);
///
/// clock.advance(500);
/// assert_eq!(clock.now_ms(), 1500);
/// ```
#[derive(Debug, Default)]
pub struct MockClock {
    current_ms: u64,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self { current_ms: 0 }
    }

    /// Sets the current time in milliseconds.
    pub fn set(&mut self, ms: u64) {
        self.current_ms = ms;
    }

    /// Advances the clock by the given duration.
    pub fn advance(&mut self, ms: u64) {
        self.current_ms += ms;
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.current_ms
    }
}

// ============================================================================
// Board
// ============================================================================

/// Board made of the mocks in this module.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockBoard;

impl Board for MockBoard {
    type Sensor = MockSensor;
    type Output = MockPin;
    type Buttons = MockButtons;
    type Display = MockDisplay;
}

impl MockBoard {
    /// Fresh mock peripherals: mid-scale sensor, outputs low, buttons released.
    pub fn hardware() -> Hardware<MockBoard> {
        Hardware {
            sensor: MockSensor::default(),
            relay: MockPin::new(),
            buzzer: MockPin::new(),
            buttons: MockButtons::new(),
            display: MockDisplay::new(),
        }
    }
}
