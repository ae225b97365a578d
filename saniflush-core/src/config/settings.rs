//! Operator-editable flush settings
//!
//! Every editable value carries a descriptor with its range, step and
//! persistent key. Values written through [`FlushSettings::set`] and the
//! step helpers are always clamped into range.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::SettingsStore;

/// Pump throughput used when nothing else is configured
pub const DEFAULT_PUMP_RATE_ML_PER_S: u32 = 50;

/// Pump hold used when the configured rate cannot produce a duration
pub const FALLBACK_PUMP_HOLD_MS: u64 = 2000;

/// Number of editable settings
pub const SETTING_COUNT: usize = 7;

/// Settings errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Pump rate of zero, pump duration is undefined
    ZeroPumpRate,
    /// Stored block has the wrong magic or version
    InvalidFormat,
    /// Stored block failed its checksum
    CrcMismatch,
}

/// Editable setting identifiers, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingId {
    RightToiletDelay = 0,
    FlushTimeLapse = 1,
    WasteTriggerDelay = 2,
    CameraTriggerDelay = 3,
    PumpWasteDose = 4,
    ToiletRelayHold = 5,
    CameraCaptureCount = 6,
}

impl SettingId {
    pub const ALL: [SettingId; SETTING_COUNT] = [
        SettingId::RightToiletDelay,
        SettingId::FlushTimeLapse,
        SettingId::WasteTriggerDelay,
        SettingId::CameraTriggerDelay,
        SettingId::PumpWasteDose,
        SettingId::ToiletRelayHold,
        SettingId::CameraCaptureCount,
    ];

    /// Range and labelling for this setting
    pub fn descriptor(self) -> &'static SettingDescriptor {
        &SETTINGS[self as usize]
    }

    /// Look up a setting by its persistent key
    pub fn from_key(key: &str) -> Option<Self> {
        SETTINGS.iter().find(|d| d.key == key).map(|d| d.id)
    }
}

/// Range, step and labelling of one editable setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingDescriptor {
    pub id: SettingId,
    pub label: &'static str,
    /// Display unit, empty for plain counts
    pub unit: &'static str,
    pub default: u32,
    pub min: u32,
    pub max: u32,
    pub step: u32,
    /// Persistent key
    pub key: &'static str,
}

impl SettingDescriptor {
    pub const fn clamp(&self, value: u32) -> u32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

/// Descriptor table, indexed by `SettingId as usize`
pub static SETTINGS: [SettingDescriptor; SETTING_COUNT] = [
    SettingDescriptor {
        id: SettingId::RightToiletDelay,
        label: "Right Toilet Delay",
        unit: "sec",
        default: 10,
        min: 5,
        max: 40,
        step: 5,
        key: "rightDelay",
    },
    SettingDescriptor {
        id: SettingId::FlushTimeLapse,
        label: "Flush Time Lapse",
        unit: "min",
        default: 5,
        min: 1,
        max: 45,
        step: 5,
        key: "flushTime",
    },
    SettingDescriptor {
        id: SettingId::WasteTriggerDelay,
        label: "Waste Trigger Delay",
        unit: "ms",
        default: 5000,
        min: 2500,
        max: 20000,
        step: 2500,
        key: "wasteDelay",
    },
    SettingDescriptor {
        id: SettingId::CameraTriggerDelay,
        label: "Camera Trigger Delay",
        unit: "ms",
        default: 2500,
        min: 2500,
        max: 20000,
        step: 2500,
        key: "cameraDelay",
    },
    SettingDescriptor {
        id: SettingId::PumpWasteDose,
        label: "Pump Waste Dose",
        unit: "ml",
        default: 100,
        min: 50,
        max: 300,
        step: 50,
        key: "pumpDose",
    },
    SettingDescriptor {
        id: SettingId::ToiletRelayHold,
        label: "Toilet Relay Hold",
        unit: "ms",
        default: 2000,
        min: 1000,
        max: 6000,
        step: 1000,
        key: "relayHold",
    },
    SettingDescriptor {
        id: SettingId::CameraCaptureCount,
        label: "Camera Capture Count",
        unit: "",
        default: 3,
        min: 1,
        max: 30,
        step: 1,
        key: "cameraCount",
    },
];

/// Live flush settings
///
/// The seven editable values plus two tuning values that are only set
/// through persisted data: pump throughput and the gap between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlushSettings {
    /// Delay before the right toilet starts its first cycle (seconds)
    pub right_toilet_delay_s: u32,
    /// Length of one flush cycle (minutes)
    pub flush_time_lapse_min: u32,
    /// Waste pump start, measured from cycle start (ms)
    pub waste_trigger_delay_ms: u32,
    /// Camera start, measured from cycle completion (ms)
    pub camera_trigger_delay_ms: u32,
    /// Waste dosed per flush (ml)
    pub pump_dose_ml: u32,
    /// Flush valve hold (ms)
    pub relay_hold_ms: u32,
    /// Photograph every N completed flushes
    pub camera_capture_every: u32,
    /// Pump throughput (ml/s)
    pub pump_rate_ml_per_s: u32,
    /// Gap between a completed cycle and the next one (ms), 0 = continuous
    pub flush_cycle_gap_ms: u32,
}

impl Default for FlushSettings {
    fn default() -> Self {
        Self {
            right_toilet_delay_s: SettingId::RightToiletDelay.descriptor().default,
            flush_time_lapse_min: SettingId::FlushTimeLapse.descriptor().default,
            waste_trigger_delay_ms: SettingId::WasteTriggerDelay.descriptor().default,
            camera_trigger_delay_ms: SettingId::CameraTriggerDelay.descriptor().default,
            pump_dose_ml: SettingId::PumpWasteDose.descriptor().default,
            relay_hold_ms: SettingId::ToiletRelayHold.descriptor().default,
            camera_capture_every: SettingId::CameraCaptureCount.descriptor().default,
            pump_rate_ml_per_s: DEFAULT_PUMP_RATE_ML_PER_S,
            flush_cycle_gap_ms: 0,
        }
    }
}

impl FlushSettings {
    fn slot_mut(&mut self, id: SettingId) -> &mut u32 {
        match id {
            SettingId::RightToiletDelay => &mut self.right_toilet_delay_s,
            SettingId::FlushTimeLapse => &mut self.flush_time_lapse_min,
            SettingId::WasteTriggerDelay => &mut self.waste_trigger_delay_ms,
            SettingId::CameraTriggerDelay => &mut self.camera_trigger_delay_ms,
            SettingId::PumpWasteDose => &mut self.pump_dose_ml,
            SettingId::ToiletRelayHold => &mut self.relay_hold_ms,
            SettingId::CameraCaptureCount => &mut self.camera_capture_every,
        }
    }

    /// Current value of an editable setting
    pub fn get(&self, id: SettingId) -> u32 {
        match id {
            SettingId::RightToiletDelay => self.right_toilet_delay_s,
            SettingId::FlushTimeLapse => self.flush_time_lapse_min,
            SettingId::WasteTriggerDelay => self.waste_trigger_delay_ms,
            SettingId::CameraTriggerDelay => self.camera_trigger_delay_ms,
            SettingId::PumpWasteDose => self.pump_dose_ml,
            SettingId::ToiletRelayHold => self.relay_hold_ms,
            SettingId::CameraCaptureCount => self.camera_capture_every,
        }
    }

    /// Store `value` clamped into range, returning what was stored
    pub fn set(&mut self, id: SettingId, value: u32) -> u32 {
        let clamped = id.descriptor().clamp(value);
        *self.slot_mut(id) = clamped;
        clamped
    }

    /// Step a setting up, saturating at its maximum
    pub fn increment(&mut self, id: SettingId) -> u32 {
        let step = id.descriptor().step;
        self.set(id, self.get(id).saturating_add(step))
    }

    /// Step a setting down, saturating at its minimum
    pub fn decrement(&mut self, id: SettingId) -> u32 {
        let step = id.descriptor().step;
        self.set(id, self.get(id).saturating_sub(step))
    }

    /// Clamp every editable value into range
    ///
    /// Returns true if anything had to change.
    pub fn sanitize(&mut self) -> bool {
        let mut changed = false;
        for id in SettingId::ALL {
            let before = self.get(id);
            if self.set(id, before) != before {
                changed = true;
            }
        }
        changed
    }
}

impl SettingsStore for FlushSettings {
    fn flush_workflow_repeat_ms(&self) -> u64 {
        u64::from(self.flush_time_lapse_min) * 60_000
    }

    fn waste_repo_trigger_delay_ms(&self) -> u64 {
        u64::from(self.waste_trigger_delay_ms)
    }

    fn camera_trigger_after_flush_ms(&self) -> u64 {
        u64::from(self.camera_trigger_delay_ms)
    }

    fn waste_qty_per_flush_ml(&self) -> u32 {
        self.pump_dose_ml
    }

    fn pic_every_n_flushes(&self) -> u32 {
        self.camera_capture_every
    }

    fn right_toilet_flush_delay_s(&self) -> u32 {
        self.right_toilet_delay_s
    }

    fn toilet_flush_relay_hold_ms(&self) -> u64 {
        u64::from(self.relay_hold_ms)
    }

    fn pump_rate_ml_per_s(&self) -> u32 {
        self.pump_rate_ml_per_s
    }

    fn flush_cycle_gap_ms(&self) -> u64 {
        u64::from(self.flush_cycle_gap_ms)
    }
}

/// Time the pump needs to dose `qty_ml` at `rate_ml_per_s`
pub fn pump_hold_ms(qty_ml: u32, rate_ml_per_s: u32) -> Result<u64, SettingsError> {
    if rate_ml_per_s == 0 {
        return Err(SettingsError::ZeroPumpRate);
    }
    Ok(u64::from(qty_ml) * 1000 / u64::from(rate_ml_per_s))
}

/// Pump hold for the current settings, falling back to a bounded default
/// when the rate is unusable
pub fn pump_duration_ms<S: SettingsStore + ?Sized>(settings: &S) -> u64 {
    match pump_hold_ms(settings.waste_qty_per_flush_ml(), settings.pump_rate_ml_per_s()) {
        Ok(ms) => ms,
        Err(e) => {
            log_error!(
                "pump duration unavailable ({}), holding {} ms",
                e,
                FALLBACK_PUMP_HOLD_MS
            );
            FALLBACK_PUMP_HOLD_MS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_descriptors() {
        let settings = FlushSettings::default();
        for id in SettingId::ALL {
            assert_eq!(settings.get(id), id.descriptor().default);
        }
        assert_eq!(settings.flush_workflow_repeat_ms(), 300_000);
        assert_eq!(settings.pump_rate_ml_per_s, DEFAULT_PUMP_RATE_ML_PER_S);
    }

    #[test]
    fn test_descriptor_table_order() {
        for (i, d) in SETTINGS.iter().enumerate() {
            assert_eq!(d.id as usize, i);
            assert!(d.min <= d.default && d.default <= d.max);
            assert!(d.step > 0);
        }
    }

    #[test]
    fn test_set_clamps() {
        let mut settings = FlushSettings::default();
        assert_eq!(settings.set(SettingId::PumpWasteDose, 1000), 300);
        assert_eq!(settings.set(SettingId::PumpWasteDose, 0), 50);
        assert_eq!(settings.set(SettingId::RightToiletDelay, 25), 25);
    }

    #[test]
    fn test_increment_saturates_at_max() {
        let mut settings = FlushSettings::default();
        // 5 -> 10 -> ... -> 45, never past max
        for _ in 0..20 {
            settings.increment(SettingId::FlushTimeLapse);
        }
        assert_eq!(settings.flush_time_lapse_min, 45);
    }

    #[test]
    fn test_decrement_saturates_at_min() {
        let mut settings = FlushSettings::default();
        settings.decrement(SettingId::CameraTriggerDelay);
        assert_eq!(settings.camera_trigger_delay_ms, 2500);

        settings.set(SettingId::FlushTimeLapse, 1);
        settings.decrement(SettingId::FlushTimeLapse);
        assert_eq!(settings.flush_time_lapse_min, 1);
    }

    #[test]
    fn test_sanitize_reports_changes() {
        let mut settings = FlushSettings::default();
        assert!(!settings.sanitize());

        settings.relay_hold_ms = 60_000;
        settings.camera_capture_every = 0;
        assert!(settings.sanitize());
        assert_eq!(settings.relay_hold_ms, 6000);
        assert_eq!(settings.camera_capture_every, 1);
    }

    #[test]
    fn test_from_key() {
        assert_eq!(SettingId::from_key("pumpDose"), Some(SettingId::PumpWasteDose));
        assert_eq!(SettingId::from_key("cameraCount"), Some(SettingId::CameraCaptureCount));
        assert_eq!(SettingId::from_key("nope"), None);
    }

    #[test]
    fn test_pump_hold() {
        assert_eq!(pump_hold_ms(100, 50), Ok(2000));
        assert_eq!(pump_hold_ms(300, 50), Ok(6000));
        assert_eq!(pump_hold_ms(100, 0), Err(SettingsError::ZeroPumpRate));
    }

    #[test]
    fn test_zero_rate_uses_fallback() {
        let settings = FlushSettings {
            pump_rate_ml_per_s: 0,
            ..Default::default()
        };
        assert_eq!(pump_duration_ms(&settings), FALLBACK_PUMP_HOLD_MS);
    }
}
