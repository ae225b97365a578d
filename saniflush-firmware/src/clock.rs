//! Embassy-backed monotonic clock

use embassy_time::Instant;

use saniflush_core::traits::Clock;
use saniflush_core::Millis;

/// Milliseconds since boot
pub fn now_ms() -> Millis {
    Instant::now().as_millis()
}

/// [`Clock`] over the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> Millis {
        now_ms()
    }
}
