//! Device configuration loading
//!
//! A TOML file stored in flash under `StorageKey::DeviceConfigToml` takes
//! precedence over the copy embedded at build time.

extern crate alloc;

use alloc::vec;
use core::str;
use defmt::*;

use saniflush_hal_rp2040::flash::{FlashError, FlashStorage, StorageKey, MAX_ITEM_SIZE};
use saniflush_hal_rp2040::FlashStorageTrait;

use super::toml::{parse_device_config, DeviceToml, ParseError};

/// Device config loading errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Flash operation failed
    Flash(FlashError),
    /// Invalid UTF-8 in TOML data
    InvalidUtf8,
    /// TOML parsing failed
    Parse(ParseError),
}

impl From<FlashError> for ConfigError {
    fn from(e: FlashError) -> Self {
        ConfigError::Flash(e)
    }
}

impl From<ParseError> for ConfigError {
    fn from(e: ParseError) -> Self {
        ConfigError::Parse(e)
    }
}

/// Load the device configuration
///
/// Never fails: a missing or broken flash copy falls back to `embedded`,
/// and a broken embedded copy (build.rs validates it) falls back to the
/// compiled-in defaults.
pub async fn load_device_config(storage: &mut FlashStorage<'_>, embedded: &str) -> DeviceToml {
    match load_from_flash(storage).await {
        Ok(config) => {
            info!("Loaded device config from flash");
            return config;
        }
        Err(ConfigError::Flash(FlashError::NotFound)) => {
            debug!("No device config in flash, using embedded");
        }
        Err(e) => {
            warn!("Failed to load device config from flash: {:?}, using embedded", e);
        }
    }

    match parse_device_config(embedded) {
        Ok(config) => config,
        Err(e) => {
            error!("Embedded device config invalid: {:?}, using defaults", e);
            DeviceToml::default()
        }
    }
}

async fn load_from_flash(storage: &mut FlashStorage<'_>) -> Result<DeviceToml, ConfigError> {
    // Too large for the task stack; lives on the heap for the parse only
    let mut buffer = vec![0u8; MAX_ITEM_SIZE];
    let len = storage
        .read(StorageKey::DeviceConfigToml, &mut buffer)
        .await?;

    debug!("Read {} bytes of TOML from flash", len);

    let text = str::from_utf8(&buffer[..len]).map_err(|_| ConfigError::InvalidUtf8)?;
    let config = parse_device_config(text)?;
    Ok(config)
}
