//! Relay channels and hold-window timing
//!
//! Four outputs: a flush valve and a waste pump per side. Each channel is
//! energized for a hold window and released exactly once when the window
//! has elapsed, independent of every other timer in the system.

mod channel;
mod controller;

pub use channel::{RelayChannel, RelayId, RELAY_COUNT};
pub use controller::RelayController;
