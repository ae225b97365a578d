//! GPIO relay output
//!
//! Drives a relay module input (or a transistor stage) from a single pin.

use saniflush_core::traits::RelayOutput;
use saniflush_hal::OutputPin;

/// Relay on a GPIO pin
///
/// Many opto-isolated relay boards energize on a low input; those are
/// built with [`GpioRelay::new_active_low`].
pub struct GpioRelay<P> {
    pin: P,
    /// If true, relay energized = pin LOW
    inverted: bool,
    energized: bool,
}

impl<P: OutputPin> GpioRelay<P> {
    /// Wrap `pin`, releasing the relay immediately
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut relay = Self {
            pin,
            inverted,
            energized: false,
        };
        relay.set_energized(false);
        relay
    }

    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }
}

impl<P: OutputPin> RelayOutput for GpioRelay<P> {
    fn set_energized(&mut self, on: bool) {
        self.energized = on;
        self.pin.set_state(on != self.inverted);
    }

    fn is_energized(&self) -> bool {
        self.energized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
        writes: u32,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                high: false,
                writes: 0,
            }
        }
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
            self.writes += 1;
        }

        fn set_low(&mut self) {
            self.high = false;
            self.writes += 1;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_active_high_relay() {
        let mut relay = GpioRelay::new_active_high(MockPin::new());
        assert!(!relay.is_energized());
        assert!(relay.pin.is_set_low());

        relay.set_energized(true);
        assert!(relay.is_energized());
        assert!(relay.pin.is_set_high());

        relay.set_energized(false);
        assert!(relay.pin.is_set_low());
    }

    #[test]
    fn test_active_low_relay() {
        let mut relay = GpioRelay::new_active_low(MockPin::new());
        // released means pin high
        assert!(!relay.is_energized());
        assert!(relay.pin.is_set_high());

        relay.set_energized(true);
        assert!(relay.pin.is_set_low());
        assert!(relay.is_inverted());
    }

    #[test]
    fn test_one_pin_write_per_call() {
        let mut relay = GpioRelay::new_active_high(MockPin::new());
        relay.set_energized(true);
        relay.set_energized(false);
        // construction, on, off
        assert_eq!(relay.pin.writes, 3);
    }
}
