//! Main controller task
//!
//! Owns the flush controller and drives it from tick signals, control
//! events and settings updates.

use defmt::*;
use embassy_futures::select::{select3, Either3};
use embassy_rp::uart::BufferedUart;

use saniflush_core::capture::CaptureConfig;
use saniflush_core::config::FlushSettings;
use saniflush_core::controller::FlushController;
use saniflush_core::relay::RELAY_COUNT;
use saniflush_core::workflow::WorkflowEvent;
use saniflush_drivers::camera::HttpCaptureClient;
use saniflush_drivers::relay::GpioRelay;
use saniflush_hal_rp2040::gpio::RelayPin;

use crate::channels::{CONTROL_CHANNEL, SETTINGS_APPLY};
use crate::clock::{now_ms, EmbassyClock};
use crate::status::LogSurface;
use crate::tasks::tick::TICK_SIGNAL;

pub type FirmwareRelay = GpioRelay<RelayPin>;

/// Capture client over the bridge UART
pub type CameraClient = HttpCaptureClient<BufferedUart, EmbassyClock>;

#[embassy_executor::task]
pub async fn controller_task(
    outputs: [FirmwareRelay; RELAY_COUNT],
    capture: CaptureConfig,
    mut settings: FlushSettings,
    mut camera: CameraClient,
) {
    info!("Controller task started");

    let mut controller = FlushController::new(outputs, capture);
    let mut surface = LogSurface;

    loop {
        match select3(
            CONTROL_CHANNEL.receive(),
            TICK_SIGNAL.wait(),
            SETTINGS_APPLY.wait(),
        )
        .await
        {
            Either3::First(event) => {
                let before = controller.state();
                let after = controller.handle(event, now_ms(), &settings, &mut surface);
                if before != after {
                    info!("{:?}: {} -> {}", event, before, after);
                }
            }

            Either3::Second(now) => {
                let events =
                    controller.tick(now, &settings, &mut surface, &mut camera, &EmbassyClock);
                for event in events {
                    log_workflow_event(&event);
                }
            }

            Either3::Third(updated) => {
                // Thresholds are read fresh every tick, so this takes effect
                // on the next one without restarting the cycle
                settings = updated;
                info!("Settings updated");
            }
        }
    }
}

fn log_workflow_event(event: &WorkflowEvent) {
    match event {
        WorkflowEvent::CycleStarted { side } => info!("{} cycle started", side),
        WorkflowEvent::CycleCompleted { side, flush_count } => {
            info!("{} cycle completed, {} flushes total", side, flush_count)
        }
        WorkflowEvent::CameraScheduled { side, due_at } => {
            debug!("{} capture due at {}", side, due_at)
        }
        other => debug!("{:?}", other),
    }
}
