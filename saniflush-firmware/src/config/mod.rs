//! Configuration loading and persistence
//!
//! Device wiring comes from TOML (flash override or the embedded default),
//! operator settings from a postcard block in flash.

pub mod loader;
pub mod settings;
pub mod toml;

pub use loader::load_device_config;
pub use settings::{load_settings, save_settings};
pub use toml::DeviceToml;
