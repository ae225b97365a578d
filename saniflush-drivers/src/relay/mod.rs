//! Relay output drivers

pub mod gpio;

pub use gpio::GpioRelay;
