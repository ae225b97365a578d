//! Build script for saniflush-firmware
//!
//! - Copies memory.x next to the build output for the linker
//! - Validates device.toml at compile time

use std::collections::HashSet;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Highest user GPIO on the RP2040
const MAX_GPIO: u8 = 29;

/// Lengths must match the heapless capacities in saniflush-core
const MAX_HOST_LEN: usize = 32;
const MAX_CAMERA_ID_LEN: usize = 16;
const MAX_IMAGE_PREFIX_LEN: usize = 24;

const RELAY_KEYS: [&str; 4] = ["valve_left", "valve_right", "pump_left", "pump_right"];

fn main() {
    setup_linker();
    validate_config();
}

fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).expect("create memory.x");
    f.write_all(memory_x).expect("write memory.x");

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let path = Path::new("device.toml");
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read device.toml", &[e.to_string()]),
    };

    let config: toml::Table = match toml::from_str(&content) {
        Ok(table) => table,
        Err(e) => fail(
            "Invalid TOML syntax in device.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    let mut used_pins = HashSet::new();

    validate_relays(&config, &mut used_pins, &mut errors);
    validate_button(&config, &mut used_pins, &mut errors);
    validate_bridge(&config, &mut used_pins, &mut errors);
    validate_capture(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid device.toml", &errors);
    }

    println!("cargo:warning=device.toml validated successfully");
}

/// Abort the build with a boxed error listing
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let line = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.clone()
            };
            format!("║  • {:<62} ║", line)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}

fn section<'a>(config: &'a toml::Table, name: &str, errors: &mut Vec<String>) -> Option<&'a toml::Table> {
    match config.get(name) {
        Some(toml::Value::Table(t)) => Some(t),
        Some(_) => {
            errors.push(format!("[{}] must be a table", name));
            None
        }
        None => {
            errors.push(format!("missing [{}] section", name));
            None
        }
    }
}

/// Check a "gpioN" / "!gpioN" pin string, returning the pin number
fn check_pin(
    value: Option<&toml::Value>,
    what: &str,
    used: &mut HashSet<u8>,
    errors: &mut Vec<String>,
) -> Option<u8> {
    let Some(value) = value else {
        errors.push(format!("{} missing", what));
        return None;
    };
    let Some(s) = value.as_str() else {
        errors.push(format!("{} must be a string like \"gpio2\"", what));
        return None;
    };

    let bare = s.trim_start_matches('!');
    let pin = bare
        .strip_prefix("gpio")
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|n| *n <= MAX_GPIO);

    match pin {
        Some(pin) => {
            if !used.insert(pin) {
                errors.push(format!("{} reuses gpio{}", what, pin));
            }
            Some(pin)
        }
        None => {
            errors.push(format!("{} '{}' is not gpio0..gpio{}", what, s, MAX_GPIO));
            None
        }
    }
}

fn check_int(table: &toml::Table, key: &str, min: i64, max: i64, ctx: &str, errors: &mut Vec<String>) {
    match table.get(key) {
        None => {}
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
        Some(_) => errors.push(format!("[{}] {} must be {}-{}", ctx, key, min, max)),
    }
}

fn check_str_len(table: &toml::Table, key: &str, max: usize, ctx: &str, errors: &mut Vec<String>) {
    match table.get(key) {
        None => errors.push(format!("[{}] missing '{}'", ctx, key)),
        Some(toml::Value::String(s)) if !s.is_empty() && s.len() <= max => {}
        Some(_) => errors.push(format!("[{}] {} must be 1-{} characters", ctx, key, max)),
    }
}

fn validate_relays(config: &toml::Table, used: &mut HashSet<u8>, errors: &mut Vec<String>) {
    let Some(relays) = section(config, "relays", errors) else {
        return;
    };
    for key in RELAY_KEYS {
        check_pin(relays.get(key), &format!("[relays] {}", key), used, errors);
    }
}

fn validate_button(config: &toml::Table, used: &mut HashSet<u8>, errors: &mut Vec<String>) {
    let Some(button) = section(config, "button", errors) else {
        return;
    };
    check_pin(button.get("pin"), "[button] pin", used, errors);
    check_int(button, "debounce_ms", 1, 1000, "button", errors);
}

fn validate_bridge(config: &toml::Table, used: &mut HashSet<u8>, errors: &mut Vec<String>) {
    let Some(bridge) = section(config, "bridge", errors) else {
        return;
    };
    check_pin(bridge.get("uart_tx_pin"), "[bridge] uart_tx_pin", used, errors);
    check_pin(bridge.get("uart_rx_pin"), "[bridge] uart_rx_pin", used, errors);
    check_int(bridge, "baudrate", 1200, 3_000_000, "bridge", errors);
    check_int(bridge, "timeout_ms", 100, 60_000, "bridge", errors);
    check_str_len(bridge, "host", MAX_HOST_LEN, "bridge", errors);
}

fn validate_capture(config: &toml::Table, errors: &mut Vec<String>) {
    let Some(capture) = section(config, "capture", errors) else {
        return;
    };
    check_int(capture, "second_delay_ms", 0, 10_000, "capture", errors);

    for side in ["left", "right"] {
        let Some(toml::Value::Table(side_table)) = capture.get(side) else {
            errors.push(format!("missing [capture.{}.*] sections", side));
            continue;
        };
        for slot in ["primary", "secondary"] {
            let ctx = format!("capture.{}.{}", side, slot);
            let Some(toml::Value::Table(target)) = side_table.get(slot) else {
                errors.push(format!("missing [{}]", ctx));
                continue;
            };
            check_str_len(target, "camera", MAX_CAMERA_ID_LEN, &ctx, errors);
            check_str_len(target, "prefix", MAX_IMAGE_PREFIX_LEN, &ctx, errors);
            if let Some(flip) = target.get("flip") {
                if !flip.is_bool() {
                    errors.push(format!("[{}] flip must be true or false", ctx));
                }
            }
        }
    }
}
