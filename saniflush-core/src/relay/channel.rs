//! Relay channel identity and hold state

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Millis, Side};

pub const RELAY_COUNT: usize = 4;

/// Physical relay channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RelayId {
    ValveLeft,
    ValveRight,
    PumpLeft,
    PumpRight,
}

impl RelayId {
    pub const ALL: [RelayId; RELAY_COUNT] = [
        RelayId::ValveLeft,
        RelayId::ValveRight,
        RelayId::PumpLeft,
        RelayId::PumpRight,
    ];

    /// Flush valve for a side
    pub const fn valve(side: Side) -> Self {
        match side {
            Side::Left => RelayId::ValveLeft,
            Side::Right => RelayId::ValveRight,
        }
    }

    /// Waste pump for a side
    pub const fn pump(side: Side) -> Self {
        match side {
            Side::Left => RelayId::PumpLeft,
            Side::Right => RelayId::PumpRight,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            RelayId::ValveLeft => 0,
            RelayId::ValveRight => 1,
            RelayId::PumpLeft => 2,
            RelayId::PumpRight => 3,
        }
    }
}

/// Hold state of one channel
///
/// While `active`, the channel retires once `now - activated_at >= hold_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelayChannel {
    pub active: bool,
    pub activated_at: Millis,
    pub hold_ms: u64,
}

impl RelayChannel {
    pub fn is_due(&self, now: Millis) -> bool {
        self.active && now.saturating_sub(self.activated_at) >= self.hold_ms
    }
}
