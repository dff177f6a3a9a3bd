//! Persistent storage for the moisture threshold.

/// Non-volatile storage holding the single threshold value.
///
/// Implementations block until the write completes. Callers treat every
/// error as non-fatal.
pub trait ThresholdStorage {
    /// Error type for storage operations.
    type Error: core::fmt::Debug;

    /// Loads the stored value, or `Ok(None)` if nothing has been written yet.
    fn load(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Stores `value`, replacing any previous value.
    fn save(&mut self, value: u8) -> Result<(), Self::Error>;
}
