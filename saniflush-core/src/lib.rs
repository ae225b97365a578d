//! Board-agnostic core logic for the dual-toilet flush controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Relay hold-window timing for the valve and pump outputs
//! - Staged animation sequences coupled to relay activation
//! - The per-side flush workflow scheduler and its counters
//! - Dual camera capture sequencing
//! - Operator settings with ranges and persistence framing
//! - Hardware abstraction traits (relay output, presentation, capture service)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod log;

pub mod animation;
pub mod capture;
pub mod config;
pub mod controller;
pub mod geometry;
pub mod relay;
pub mod side;
pub mod state;
pub mod traits;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub use side::Side;

/// Milliseconds on the monotonic control-loop clock
pub type Millis = u64;
