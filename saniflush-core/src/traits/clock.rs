//! Monotonic clock

use crate::Millis;

/// Monotonic millisecond clock
///
/// Read by code that must see time move during a blocking call. The control
/// loop itself is handed `now` on every tick.
pub trait Clock {
    fn now_ms(&self) -> Millis;
}
