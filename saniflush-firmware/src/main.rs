//! SaniFlush - Dual-Toilet Flush Controller Firmware
//!
//! Main firmware binary for RP2040-based flush controller boards. Runs two
//! toilets through continuous flush cycles, doses waste after each flush
//! and photographs the bowls every N flushes through a network bridge on
//! UART0.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{AnyPin, Input, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_rp::Peri;
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use saniflush_core::relay::RelayId;
use saniflush_drivers::camera::HttpCaptureClient;
use saniflush_drivers::input::StartStopButton;
use saniflush_drivers::relay::GpioRelay;
use saniflush_hal_rp2040::flash::{FlashStorage, StorageKey};
use saniflush_hal_rp2040::gpio::{relay_output, Rp2040Input};
use saniflush_hal_rp2040::FlashStorageTrait;

use crate::channels::SETTINGS_SAVE;
use crate::clock::EmbassyClock;
use crate::config::{load_device_config, load_settings};

mod board;
mod channels;
mod clock;
mod config;
mod status;
mod tasks;

// Heap allocator for the flash TOML buffer
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 8KB
const HEAP_SIZE: usize = 8 * 1024;

/// Embedded default device configuration (compiled into firmware)
/// Edit device.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../device.toml");

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("SaniFlush firmware starting...");

    // Initialize heap allocator
    init_heap();

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Flash is shared by config loading here and the settings task later
    let mut storage = FlashStorage::new(p.FLASH, p.DMA_CH0);

    let device = load_device_config(&mut storage, EMBEDDED_CONFIG).await;
    if board::check_wiring(&device) > 0 {
        warn!("device.toml pins differ from board wiring, using board wiring");
    }

    let settings = load_settings(&mut storage).await;
    if !storage.exists(StorageKey::FlushSettings).await {
        // First boot: write the defaults so the block exists for editing
        SETTINGS_SAVE.signal(settings);
    }
    info!("Configuration loaded");

    // Relays, de-energized from the first instant
    let relay = |pin: Peri<'static, AnyPin>, id: RelayId| {
        let active_low = device.device.relay(id).active_low;
        GpioRelay::new(relay_output(pin, active_low), active_low)
    };
    let outputs = [
        relay(p.PIN_2.into(), RelayId::ValveLeft),
        relay(p.PIN_3.into(), RelayId::ValveRight),
        relay(p.PIN_4.into(), RelayId::PumpLeft),
        relay(p.PIN_5.into(), RelayId::PumpRight),
    ];
    info!("Relays initialized");

    // Start/stop button
    let button_cfg = device.device.button;
    let pull = if button_cfg.active_low {
        Pull::Up
    } else {
        Pull::Down
    };
    let button = StartStopButton::new(
        Rp2040Input::new(Input::new(p.PIN_6, pull)),
        button_cfg.active_low,
        button_cfg.debounce_ms,
    );

    // Setup UART for the camera bridge
    let bridge = &device.device.bridge;
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = bridge.baudrate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 512]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let camera = HttpCaptureClient::new(uart, EmbassyClock, &bridge.host, bridge.timeout_ms);

    info!(
        "UART initialized for camera bridge at {} baud, host {}",
        bridge.baudrate,
        bridge.host.as_str()
    );

    // Spawn tasks
    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::button_task(button)).unwrap();
    spawner.spawn(tasks::settings_task(storage)).unwrap();
    spawner
        .spawn(tasks::controller_task(
            outputs,
            device.device.capture.clone(),
            settings,
            camera,
        ))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
