//! Board wiring
//!
//! Pins are claimed from `embassy_rp::Peripherals` at compile time, so the
//! numbers in device.toml can only be checked against this table, not
//! change it. Polarity (`!`) from device.toml is honored at runtime.

use defmt::*;

use saniflush_core::relay::RelayId;

use crate::config::DeviceToml;

/// Relay GPIOs, indexed by `RelayId::index`
pub const RELAY_PINS: [u8; 4] = [2, 3, 4, 5];
pub const BUTTON_PIN: u8 = 6;
pub const UART_TX_PIN: u8 = 0;
pub const UART_RX_PIN: u8 = 1;

/// Warn about every pin in `config` that differs from the board wiring
///
/// Returns the number of mismatches.
pub fn check_wiring(config: &DeviceToml) -> usize {
    let mut mismatches = 0;

    for id in RelayId::ALL {
        if let Some(pin) = config.relay_pins[id.index()] {
            let wired = RELAY_PINS[id.index()];
            if pin.pin != wired {
                warn!("relay {} configured on gpio{} but wired to gpio{}", id, pin.pin, wired);
                mismatches += 1;
            }
        }
    }

    let fixed = [
        ("button", config.button_pin.map(|p| p.pin), BUTTON_PIN),
        ("uart tx", config.uart_tx_pin, UART_TX_PIN),
        ("uart rx", config.uart_rx_pin, UART_RX_PIN),
    ];
    for (name, configured, wired) in fixed {
        if let Some(pin) = configured {
            if pin != wired {
                warn!("{} configured on gpio{} but wired to gpio{}", name, pin, wired);
                mismatches += 1;
            }
        }
    }

    mismatches
}
