//! RP2040-specific HAL for the flush controller firmware
//!
//! Implements the shared `saniflush-hal` traits on top of `embassy-rp`:
//!
//! - GPIO input wrapper for the start/stop button
//! - Flash storage driver (implements `saniflush_hal::FlashStorage`)

#![no_std]

pub mod flash;
pub mod gpio;

pub use saniflush_hal::{FlashStorage as FlashStorageTrait, StorageKey};
