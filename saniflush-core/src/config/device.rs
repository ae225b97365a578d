//! Device (hardware) configuration types
//!
//! Describes how this particular board is wired: relay polarity, the
//! start/stop button, the link to the camera bridge and which cameras
//! photograph which toilet. Parsed from TOML by the firmware.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::capture::CaptureConfig;
use crate::relay::{RelayId, RELAY_COUNT};

pub const MAX_HOST_LEN: usize = 32;

/// Relay channel wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelayHwConfig {
    /// Relay energizes when the pin is driven low
    pub active_low: bool,
}

/// Start/stop button wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ButtonConfig {
    /// Pressed reads low (button to ground with pull-up)
    pub active_low: bool,
    /// Level must be stable this long before a press counts
    pub debounce_ms: u32,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            active_low: true,
            debounce_ms: 30,
        }
    }
}

/// Serial link to the network bridge that fronts the cameras
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BridgeConfig {
    pub baudrate: u32,
    /// Host header sent with capture requests
    pub host: String<MAX_HOST_LEN>,
    /// Upper bound for one capture exchange
    pub timeout_ms: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        let mut host = String::new();
        let _ = host.push_str("camera.local");
        Self {
            baudrate: 115_200,
            host,
            timeout_ms: 3000,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// Indexed by `RelayId::index`
    pub relays: [RelayHwConfig; RELAY_COUNT],
    pub button: ButtonConfig,
    pub bridge: BridgeConfig,
    pub capture: CaptureConfig,
}

impl DeviceConfig {
    pub fn relay(&self, id: RelayId) -> RelayHwConfig {
        self.relays[id.index()]
    }
}
