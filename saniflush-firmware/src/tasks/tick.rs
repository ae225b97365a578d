//! Control-loop tick
//!
//! Relay hold windows and animation stages are resolved to this interval.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};

use saniflush_core::Millis;

use crate::clock::now_ms;

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 50;

/// Signal to notify controller of tick, carries milliseconds since boot
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, Millis> = Signal::new();

#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        ticker.next().await;
        TICK_SIGNAL.signal(now_ms());
    }
}
