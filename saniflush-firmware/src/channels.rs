//! Inter-task communication channels
//!
//! The controller task owns all workflow state; everything else reaches it
//! through these statics.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use saniflush_core::config::FlushSettings;
use saniflush_core::state::ControlEvent;

/// Channel capacity for control events
const CONTROL_CHANNEL_SIZE: usize = 4;

/// Start/stop requests (button presses)
pub static CONTROL_CHANNEL: Channel<CriticalSectionRawMutex, ControlEvent, CONTROL_CHANNEL_SIZE> =
    Channel::new();

/// Settings to persist (consumed by the settings task)
pub static SETTINGS_SAVE: Signal<CriticalSectionRawMutex, FlushSettings> = Signal::new();

/// Settings persisted and ready to take effect (consumed by the controller)
pub static SETTINGS_APPLY: Signal<CriticalSectionRawMutex, FlushSettings> = Signal::new();
