//! Minimal TOML parser for device.toml
//!
//! Handles only the subset device.toml uses, not the full TOML grammar.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - [section] and [section.sub.sub] headers
//! - Comments (# ...), including after a value
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Dotted keys outside section headers

use saniflush_core::config::DeviceConfig;
use saniflush_core::relay::{RelayId, RELAY_COUNT};
use saniflush_core::traits::CaptureRequest;
use saniflush_core::Side;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Invalid pin string
    InvalidPin,
    /// String longer than its field allows
    TooLong,
}

/// GPIO reference from the config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    pub pin: u8,
    /// Written as "!gpioN": the active level is low
    pub inverted: bool,
}

/// Parsed device.toml
///
/// The board wires pins at compile time, so pin numbers are kept beside
/// the core config for a consistency check rather than folded into it.
#[derive(Debug, Clone, Default)]
pub struct DeviceToml {
    pub device: DeviceConfig,
    /// Indexed by `RelayId::index`
    pub relay_pins: [Option<PinConfig>; RELAY_COUNT],
    pub button_pin: Option<PinConfig>,
    pub uart_tx_pin: Option<u8>,
    pub uart_rx_pin: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Relays,
    Button,
    Bridge,
    Capture,
    /// `[capture.<side>.<primary|secondary>]`
    Target(Side, usize),
}

/// Parse device.toml text
pub fn parse_device_config(input: &str) -> Result<DeviceToml, ParseError> {
    let mut out = DeviceToml::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        // Unparseable lines are skipped like unknown keys
        let Some((key, value)) = parse_key_value(line) else {
            continue;
        };
        apply_value(&mut out, section, key, value)?;
    }

    Ok(out)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    let mut parts = header.trim().split('.');
    let first = parts.next().ok_or(ParseError::InvalidSection)?;

    let section = match first {
        "relays" => Section::Relays,
        "button" => Section::Button,
        "bridge" => Section::Bridge,
        "capture" => match (parts.next(), parts.next()) {
            (None, _) => Section::Capture,
            (Some(side), Some(slot)) => {
                let side = match side {
                    "left" => Side::Left,
                    "right" => Side::Right,
                    _ => return Err(ParseError::InvalidSection),
                };
                let slot = match slot {
                    "primary" => 0,
                    "secondary" => 1,
                    _ => return Err(ParseError::InvalidSection),
                };
                Section::Target(side, slot)
            }
            _ => return Err(ParseError::InvalidSection),
        },
        _ => return Err(ParseError::InvalidSection),
    };

    if parts.next().is_some() {
        return Err(ParseError::InvalidSection);
    }
    Ok(section)
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Strip a trailing comment unless the '#' sits inside a string
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Strip surrounding quotes; bare words are accepted as-is
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a pin string like "gpio2" or "!gpio6"
fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    let s = parse_string(value);
    let (inverted, s) = match s.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let pin = s
        .strip_prefix("gpio")
        .ok_or(ParseError::InvalidPin)?
        .parse()
        .map_err(|_| ParseError::InvalidPin)?;
    Ok(PinConfig { pin, inverted })
}

fn copy_str<const N: usize>(dest: &mut heapless::String<N>, value: &str) -> Result<(), ParseError> {
    dest.clear();
    dest.push_str(parse_string(value))
        .map_err(|_| ParseError::TooLong)
}

fn relay_for_key(key: &str) -> Option<RelayId> {
    match key {
        "valve_left" => Some(RelayId::ValveLeft),
        "valve_right" => Some(RelayId::ValveRight),
        "pump_left" => Some(RelayId::PumpLeft),
        "pump_right" => Some(RelayId::PumpRight),
        _ => None,
    }
}

fn apply_value(
    out: &mut DeviceToml,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match section {
        Section::Root => {}
        Section::Relays => {
            if let Some(id) = relay_for_key(key) {
                let pin = parse_pin(value)?;
                out.relay_pins[id.index()] = Some(pin);
                out.device.relays[id.index()].active_low = pin.inverted;
            }
        }
        Section::Button => match key {
            "pin" => {
                let pin = parse_pin(value)?;
                out.button_pin = Some(pin);
                out.device.button.active_low = pin.inverted;
            }
            "debounce_ms" => out.device.button.debounce_ms = parse_int(value)?,
            _ => {}
        },
        Section::Bridge => match key {
            "uart_tx_pin" => out.uart_tx_pin = Some(parse_pin(value)?.pin),
            "uart_rx_pin" => out.uart_rx_pin = Some(parse_pin(value)?.pin),
            "baudrate" => out.device.bridge.baudrate = parse_int(value)?,
            "host" => copy_str(&mut out.device.bridge.host, value)?,
            "timeout_ms" => out.device.bridge.timeout_ms = parse_int(value)?,
            _ => {}
        },
        Section::Capture => {
            if key == "second_delay_ms" {
                out.device.capture.second_delay_ms = parse_int(value)?;
            }
        }
        Section::Target(side, slot) => {
            let target: &mut CaptureRequest = &mut out.device.capture.targets[side.index()][slot];
            match key {
                "camera" => copy_str(&mut target.camera_id, value)?,
                "prefix" => copy_str(&mut target.image_prefix, value)?,
                "flip" => target.flip_vertical = parse_bool(value)?,
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pin() {
        assert_eq!(
            parse_pin("gpio2").unwrap(),
            PinConfig {
                pin: 2,
                inverted: false
            }
        );
        assert_eq!(
            parse_pin("\"!gpio6\"").unwrap(),
            PinConfig {
                pin: 6,
                inverted: true
            }
        );
        assert_eq!(parse_pin("pin6"), Err(ParseError::InvalidPin));
        assert_eq!(parse_pin("gpioX"), Err(ParseError::InvalidPin));
    }

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("relays").unwrap(), Section::Relays);
        assert_eq!(
            parse_section_header("capture.right.secondary").unwrap(),
            Section::Target(Side::Right, 1)
        );
        assert_eq!(
            parse_section_header("capture.middle.primary"),
            Err(ParseError::InvalidSection)
        );
        assert_eq!(parse_section_header("stepper"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_inline_comment() {
        assert_eq!(
            parse_key_value("host = \"a#b\" # bridge"),
            Some(("host", "\"a#b\""))
        );
        assert_eq!(parse_key_value("baudrate = 9600 # slow"), Some(("baudrate", "9600")));
    }

    #[test]
    fn test_parse_device_config() {
        let config_str = r#"
[relays]
valve_left = "!gpio2"
valve_right = "gpio3"

[button]
pin = "!gpio6"
debounce_ms = 50

[bridge]
baudrate = 57600
host = "bridge.lan"

[capture]
second_delay_ms = 750

[capture.left.secondary]
camera = "top"
prefix = "bowl-l"
flip = true
"#;

        let parsed = parse_device_config(config_str).unwrap();
        let device = &parsed.device;
        assert!(device.relay(RelayId::ValveLeft).active_low);
        assert!(!device.relay(RelayId::ValveRight).active_low);
        assert_eq!(parsed.relay_pins[RelayId::ValveRight.index()].map(|p| p.pin), Some(3));
        assert_eq!(parsed.relay_pins[RelayId::PumpLeft.index()], None);

        assert_eq!(device.button.debounce_ms, 50);
        assert_eq!(device.bridge.baudrate, 57_600);
        assert_eq!(device.bridge.host.as_str(), "bridge.lan");
        assert_eq!(device.capture.second_delay_ms, 750);

        let target = device.capture.secondary(Side::Left);
        assert_eq!(target.camera_id.as_str(), "top");
        assert_eq!(target.image_prefix.as_str(), "bowl-l");
        assert!(target.flip_vertical);
        // untouched targets keep their defaults
        assert_eq!(device.capture.primary(Side::Right).camera_id.as_str(), "cam2");
    }

    #[test]
    fn test_long_camera_id_rejected() {
        let config_str = "[capture.left.primary]\ncamera = \"a-very-long-camera-name\"\n";
        assert_eq!(
            parse_device_config(config_str).unwrap_err(),
            ParseError::TooLong
        );
    }
}
