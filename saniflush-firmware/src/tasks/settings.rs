//! Settings persistence task
//!
//! Owns the flash after boot. Every settings change is written before it
//! is handed to the controller.

use defmt::*;

use saniflush_hal_rp2040::flash::FlashStorage;

use crate::channels::{SETTINGS_APPLY, SETTINGS_SAVE};
use crate::config::save_settings;

#[embassy_executor::task]
pub async fn settings_task(mut storage: FlashStorage<'static>) {
    info!("Settings task started");

    loop {
        let settings = SETTINGS_SAVE.wait().await;

        if let Err(e) = save_settings(&mut storage, &settings).await {
            // Still applied: a failed write only loses the change on reboot
            error!("Failed to save settings: {:?}", e);
        }
        SETTINGS_APPLY.signal(settings);
    }
}
