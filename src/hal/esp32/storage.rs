//! Threshold persistence in ESP-IDF NVS.

use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
use esp_idf_svc::sys::EspError;

use crate::traits::ThresholdStorage;

/// NVS namespace holding controller settings.
pub const NVS_NAMESPACE: &str = "irrigation";

/// Key of the threshold value (u8).
pub const NVS_THRESHOLD_KEY: &str = "threshold";

/// Threshold stored as a single `u8` in the default NVS partition.
///
/// When the partition or namespace cannot be opened the storage runs
/// unavailable: loads report nothing stored and saves fail, so the
/// controller keeps its in-memory threshold.
///
/// # Example
///
/// ```ignore
/// use esp_idf_svc::nvs::EspDefaultNvsPartition;
/// use rs_irrigation::hal::esp32::NvsThresholdStorage;
///
/// let partition = EspDefaultNvsPartition::take().ok();
/// let storage = NvsThresholdStorage::open(partition);
/// ```
pub struct NvsThresholdStorage {
    nvs: Option<EspNvs<NvsDefault>>,
}

impl NvsThresholdStorage {
    /// Opens (creating if needed) the `irrigation` namespace read-write.
    pub fn new(partition: EspDefaultNvsPartition) -> Result<Self, EspError> {
        let nvs = EspNvs::new(partition, NVS_NAMESPACE, true)?;
        Ok(Self { nvs: Some(nvs) })
    }

    /// Opens the namespace, falling back to [`unavailable`](Self::unavailable)
    /// if there is no partition or the namespace fails to open.
    pub fn open(partition: Option<EspDefaultNvsPartition>) -> Self {
        let Some(partition) = partition else {
            log::warn!("[NVS] No partition, threshold will not persist");
            return Self::unavailable();
        };
        match Self::new(partition) {
            Ok(storage) => storage,
            Err(e) => {
                log::warn!("[NVS] Namespace open failed ({}), threshold will not persist", e);
                Self::unavailable()
            }
        }
    }

    /// Storage with no backing namespace.
    pub const fn unavailable() -> Self {
        Self { nvs: None }
    }

    /// Whether a namespace is open.
    pub fn is_available(&self) -> bool {
        self.nvs.is_some()
    }
}

/// NVS storage error.
#[derive(Debug)]
pub enum StorageError {
    /// No namespace is open.
    Unavailable,
    /// ESP-IDF NVS call failed.
    Nvs(EspError),
}

impl From<EspError> for StorageError {
    fn from(e: EspError) -> Self {
        StorageError::Nvs(e)
    }
}

impl ThresholdStorage for NvsThresholdStorage {
    type Error = StorageError;

    fn load(&mut self) -> Result<Option<u8>, StorageError> {
        match self.nvs.as_mut() {
            Some(nvs) => Ok(nvs.get_u8(NVS_THRESHOLD_KEY)?),
            None => Ok(None),
        }
    }

    fn save(&mut self, value: u8) -> Result<(), StorageError> {
        let nvs = self.nvs.as_mut().ok_or(StorageError::Unavailable)?;
        nvs.set_u8(NVS_THRESHOLD_KEY, value)?;
        Ok(())
    }
}
