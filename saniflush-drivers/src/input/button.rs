//! Debounced start/stop button
//!
//! Polled from a periodic task. A press is reported once, on the edge
//! where the pressed level has been stable for the debounce time.

use saniflush_core::Millis;
use saniflush_hal::InputPin;

pub struct StartStopButton<P> {
    pin: P,
    /// Pressed reads low
    active_low: bool,
    debounce_ms: u64,
    /// Debounced level
    pressed: bool,
    /// Last raw level and when it was first seen
    raw: bool,
    raw_since: Millis,
}

impl<P: InputPin> StartStopButton<P> {
    pub fn new(pin: P, active_low: bool, debounce_ms: u32) -> Self {
        Self {
            pin,
            active_low,
            debounce_ms: u64::from(debounce_ms),
            pressed: false,
            raw: false,
            raw_since: 0,
        }
    }

    fn read_pressed(&self) -> bool {
        self.pin.is_high() != self.active_low
    }

    /// Sample the pin, returning true exactly once per debounced press
    pub fn poll(&mut self, now: Millis) -> bool {
        let raw = self.read_pressed();
        if raw != self.raw {
            self.raw = raw;
            self.raw_since = now;
            return false;
        }

        if raw != self.pressed && now.saturating_sub(self.raw_since) >= self.debounce_ms {
            self.pressed = raw;
            return raw;
        }
        false
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}
