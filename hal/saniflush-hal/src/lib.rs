//! SaniFlush Hardware Abstraction Layer
//!
//! This crate defines the hardware seams the flush controller needs from a
//! board: digital outputs for the relay channels, a digital input for the
//! start/stop button and wear-levelled flash for persisted settings.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (saniflush-firmware)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  saniflush-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ saniflush-hal-│
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`flash::FlashStorage`] - Persistent storage

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
pub mod gpio;

pub use flash::{FlashError, FlashStorage, StorageKey};
pub use gpio::{EhOutput, InputPin, OutputPin};
