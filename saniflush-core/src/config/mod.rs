//! Configuration types
//!
//! Operator settings (editable, persisted) and device wiring (TOML).

mod device;
mod settings;
mod stored;

pub use device::{BridgeConfig, ButtonConfig, DeviceConfig, RelayHwConfig, MAX_HOST_LEN};
pub use settings::{
    pump_duration_ms, pump_hold_ms, FlushSettings, SettingDescriptor, SettingId, SettingsError,
    DEFAULT_PUMP_RATE_ML_PER_S, FALLBACK_PUMP_HOLD_MS, SETTINGS, SETTING_COUNT,
};
pub use stored::{StoredSettings, SETTINGS_MAGIC, SETTINGS_VERSION};
