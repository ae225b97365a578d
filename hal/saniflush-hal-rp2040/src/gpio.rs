//! GPIO wrappers
//!
//! Relay outputs go through `saniflush_hal::EhOutput`, since embassy's
//! `Output` already implements `embedded-hal`. Inputs get a thin wrapper
//! here so the button driver can stay chip-agnostic.

use embassy_rp::gpio::{AnyPin, Input, Level, Output};
use embassy_rp::Peri;
use saniflush_hal::EhOutput;

/// Relay output on an RP2040 pin
pub type RelayPin = EhOutput<Output<'static>>;

/// Configure `pin` as a relay output already at the de-energized level
///
/// Active-low boards get the pin driven high from the first instant so the
/// relay never clicks during boot.
pub fn relay_output(pin: Peri<'static, AnyPin>, active_low: bool) -> RelayPin {
    let idle = if active_low { Level::High } else { Level::Low };
    EhOutput::new(Output::new(pin, idle), active_low)
}

/// Digital input on an RP2040 pin
pub struct Rp2040Input<'d> {
    pin: Input<'d>,
}

impl<'d> Rp2040Input<'d> {
    pub fn new(pin: Input<'d>) -> Self {
        Self { pin }
    }
}

impl<'d> saniflush_hal::InputPin for Rp2040Input<'d> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}
