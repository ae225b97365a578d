//! Persisted settings framing
//!
//! Settings are written to flash as a postcard-encoded [`StoredSettings`]
//! block. The block carries a magic number, a format version and a CRC32
//! over the payload so a torn or stale write falls back to defaults instead
//! of driving relays with garbage.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::settings::{FlushSettings, SettingsError};

/// Identifies a settings block ("SFST")
pub const SETTINGS_MAGIC: u32 = 0x5346_5354;

/// Current settings block version
pub const SETTINGS_VERSION: u8 = 1;

/// Settings block as stored in flash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoredSettings {
    pub magic: u32,
    pub version: u8,
    pub settings: FlushSettings,
    /// CRC32 over magic, version and settings
    pub crc: u32,
}

impl StoredSettings {
    /// Frame `settings` for writing
    pub fn new(settings: FlushSettings) -> Self {
        let mut block = Self {
            magic: SETTINGS_MAGIC,
            version: SETTINGS_VERSION,
            settings,
            crc: 0,
        };
        block.crc = block.calculate_crc();
        block
    }

    pub fn calculate_crc(&self) -> u32 {
        let s = &self.settings;
        let mut crc = Crc32::new();
        crc.update(&self.magic.to_le_bytes());
        crc.update(&[self.version]);
        for word in [
            s.right_toilet_delay_s,
            s.flush_time_lapse_min,
            s.waste_trigger_delay_ms,
            s.camera_trigger_delay_ms,
            s.pump_dose_ml,
            s.relay_hold_ms,
            s.camera_capture_every,
            s.pump_rate_ml_per_s,
            s.flush_cycle_gap_ms,
        ] {
            crc.update(&word.to_le_bytes());
        }
        crc.finish()
    }

    /// Check framing and return the settings, clamped into range
    pub fn into_settings(self) -> Result<FlushSettings, SettingsError> {
        if self.magic != SETTINGS_MAGIC || self.version != SETTINGS_VERSION {
            return Err(SettingsError::InvalidFormat);
        }
        if self.crc != self.calculate_crc() {
            return Err(SettingsError::CrcMismatch);
        }
        let mut settings = self.settings;
        if settings.sanitize() {
            log_warn!("stored settings out of range, clamped");
        }
        Ok(settings)
    }
}

/// CRC-32 (IEEE 802.3, reflected)
struct Crc32(u32);

impl Crc32 {
    const POLY: u32 = 0xEDB8_8320;

    fn new() -> Self {
        Self(!0)
    }

    fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.0 ^= u32::from(byte);
            for _ in 0..8 {
                let mask = (self.0 & 1).wrapping_neg();
                self.0 = (self.0 >> 1) ^ (Self::POLY & mask);
            }
        }
    }

    fn finish(self) -> u32 {
        !self.0
    }
}
