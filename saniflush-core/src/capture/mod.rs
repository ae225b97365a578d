//! Dual photo capture after each camera flash
//!
//! Every side has two cameras. The first is asked synchronously when the
//! flash animation ends; the second follows a short fixed delay later on
//! a regular tick, so the control loop never waits on both.

mod config;
mod coordinator;

pub use config::{CaptureConfig, DEFAULT_SECOND_CAPTURE_DELAY_MS};
pub use coordinator::{CaptureCoordinator, CaptureStats, PendingCapture};
