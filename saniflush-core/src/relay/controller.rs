//! Relay controller
//!
//! Owns the four relay outputs and their hold windows. Hardware is written
//! only on a state transition: inactive to active on [`activate`], active
//! to inactive on [`tick`] or [`deactivate_all`]. Re-activating a channel
//! that is already on only restarts its window.
//!
//! [`activate`]: RelayController::activate
//! [`tick`]: RelayController::tick
//! [`deactivate_all`]: RelayController::deactivate_all

use super::channel::{RelayChannel, RelayId, RELAY_COUNT};
use crate::traits::RelayOutput;
use crate::Millis;

/// Hold-window controller for the four relay channels
pub struct RelayController<R> {
    outputs: [R; RELAY_COUNT],
    channels: [RelayChannel; RELAY_COUNT],
}

impl<R: RelayOutput> RelayController<R> {
    /// Take ownership of the outputs, indexed by `RelayId::index`
    ///
    /// Every output is forced off so the controller's view and the hardware
    /// agree from the start.
    pub fn new(mut outputs: [R; RELAY_COUNT]) -> Self {
        for out in outputs.iter_mut() {
            out.set_energized(false);
        }
        Self {
            outputs,
            channels: [RelayChannel::default(); RELAY_COUNT],
        }
    }

    /// Energize `id` for `hold_ms`, or restart its window if already on
    pub fn activate(&mut self, id: RelayId, hold_ms: u64, now: Millis) {
        let i = id.index();
        let channel = &mut self.channels[i];
        let was_active = channel.active;

        channel.active = true;
        channel.activated_at = now;
        channel.hold_ms = hold_ms;

        if was_active {
            log_debug!("relay {} re-armed for {} ms", id, hold_ms);
        } else {
            self.outputs[i].set_energized(true);
            log_debug!("relay {} on for {} ms", id, hold_ms);
        }
    }

    /// Release every channel whose hold window has elapsed
    ///
    /// Returns the number of channels released.
    pub fn tick(&mut self, now: Millis) -> usize {
        let mut released = 0;
        for id in RelayId::ALL {
            let i = id.index();
            if self.channels[i].is_due(now) {
                self.channels[i].active = false;
                self.outputs[i].set_energized(false);
                log_debug!("relay {} off", id);
                released += 1;
            }
        }
        released
    }

    /// Release every active channel immediately, ignoring hold windows
    pub fn deactivate_all(&mut self) {
        for id in RelayId::ALL {
            let i = id.index();
            if self.channels[i].active {
                self.channels[i].active = false;
                self.outputs[i].set_energized(false);
                log_info!("relay {} forced off", id);
            }
        }
    }

    pub fn is_active(&self, id: RelayId) -> bool {
        self.channels[id.index()].active
    }

    pub fn any_active(&self) -> bool {
        self.channels.iter().any(|c| c.active)
    }

    pub fn channel(&self, id: RelayId) -> &RelayChannel {
        &self.channels[id.index()]
    }

    pub fn output(&self, id: RelayId) -> &R {
        &self.outputs[id.index()]
    }
}
