//! Start/stop button polling

use defmt::*;
use embassy_time::{Duration, Ticker};

use saniflush_core::state::ControlEvent;
use saniflush_drivers::input::StartStopButton;
use saniflush_hal_rp2040::gpio::Rp2040Input;

use crate::channels::CONTROL_CHANNEL;
use crate::clock::now_ms;

/// Poll interval, well below any sensible debounce time
const POLL_INTERVAL_MS: u64 = 5;

pub type FirmwareButton = StartStopButton<Rp2040Input<'static>>;

#[embassy_executor::task]
pub async fn button_task(mut button: FirmwareButton) {
    info!("Button task started");

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));

    loop {
        ticker.next().await;
        if button.poll(now_ms()) {
            debug!("Start/stop pressed");
            if CONTROL_CHANNEL.try_send(ControlEvent::Toggle).is_err() {
                warn!("Control channel full, press dropped");
            }
        }
    }
}
