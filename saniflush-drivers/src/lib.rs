//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in saniflush-core:
//!
//! - Relay outputs on GPIO pins (active-high or active-low boards)
//! - Debounced start/stop button
//! - HTTP photo capture client over a byte stream

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod camera;
pub mod input;
pub mod relay;
