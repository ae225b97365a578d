//! Operator settings persistence
//!
//! Settings are stored as a postcard-encoded `StoredSettings` block.

use defmt::*;

use saniflush_core::config::{FlushSettings, SettingsError, StoredSettings};
use saniflush_hal_rp2040::flash::{FlashError, FlashStorage, StorageKey};
use saniflush_hal_rp2040::FlashStorageTrait;

/// Maximum serialized settings size
const MAX_SETTINGS_SIZE: usize = 128;

/// Settings persistence errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Flash operation failed
    Flash(FlashError),
    /// Deserialization failed
    Deserialize,
    /// Serialization failed
    Serialize,
    /// Block framing or CRC rejected
    Invalid(SettingsError),
}

impl From<FlashError> for PersistError {
    fn from(e: FlashError) -> Self {
        PersistError::Flash(e)
    }
}

impl From<SettingsError> for PersistError {
    fn from(e: SettingsError) -> Self {
        PersistError::Invalid(e)
    }
}

/// Load settings from flash
///
/// Returns defaults when nothing is stored or the block is unusable.
pub async fn load_settings(storage: &mut FlashStorage<'_>) -> FlushSettings {
    match load_settings_inner(storage).await {
        Ok(settings) => {
            info!("Loaded flush settings from flash");
            log_settings(&settings);
            settings
        }
        Err(PersistError::Flash(FlashError::NotFound)) => {
            debug!("No flush settings in flash, using defaults");
            FlushSettings::default()
        }
        Err(e) => {
            warn!("Failed to load flush settings: {:?}, using defaults", e);
            FlushSettings::default()
        }
    }
}

async fn load_settings_inner(
    storage: &mut FlashStorage<'_>,
) -> Result<FlushSettings, PersistError> {
    let mut buffer = [0u8; MAX_SETTINGS_SIZE];
    let len = storage.read(StorageKey::FlushSettings, &mut buffer).await?;

    debug!("Read {} bytes of settings from flash", len);

    let block: StoredSettings =
        postcard::from_bytes(&buffer[..len]).map_err(|_| PersistError::Deserialize)?;
    Ok(block.into_settings()?)
}

/// Save settings to flash
pub async fn save_settings(
    storage: &mut FlashStorage<'_>,
    settings: &FlushSettings,
) -> Result<(), PersistError> {
    let block = StoredSettings::new(*settings);

    let mut buffer = [0u8; MAX_SETTINGS_SIZE];
    let bytes = postcard::to_slice(&block, &mut buffer).map_err(|_| PersistError::Serialize)?;

    debug!("Saving {} bytes of settings to flash", bytes.len());

    storage.write(StorageKey::FlushSettings, bytes).await?;

    info!("Saved flush settings to flash");
    Ok(())
}

fn log_settings(s: &FlushSettings) {
    debug!(
        "Settings: right delay {}s, cycle {}min, waste {}ms, camera {}ms",
        s.right_toilet_delay_s,
        s.flush_time_lapse_min,
        s.waste_trigger_delay_ms,
        s.camera_trigger_delay_ms
    );
    debug!(
        "  dose {}ml @ {}ml/s, hold {}ms, photo every {}, gap {}ms",
        s.pump_dose_ml,
        s.pump_rate_ml_per_s,
        s.relay_hold_ms,
        s.camera_capture_every,
        s.flush_cycle_gap_ms
    );
}
