//! Per-side mm:ss run timer

use crate::traits::TimerReading;
use crate::Millis;

/// Minutes after which the display wraps back to 00:00
pub const TIMER_ROLLOVER_MIN: u64 = 99;

/// Run timer for one side
///
/// Reads 00:00 until its start time has been reached, so a side waiting
/// out its start delay shows a zero timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushTimer {
    start_at: Option<Millis>,
    shown: Option<TimerReading>,
}

impl FlushTimer {
    pub fn start(&mut self, at: Millis) {
        self.start_at = Some(at);
    }

    pub fn stop(&mut self) {
        self.start_at = None;
    }

    pub fn reading(&self, now: Millis) -> TimerReading {
        let Some(start) = self.start_at else {
            return TimerReading::default();
        };
        let secs = now.saturating_sub(start) / 1000;
        TimerReading {
            minutes: ((secs / 60) % TIMER_ROLLOVER_MIN) as u8,
            seconds: (secs % 60) as u8,
        }
    }

    /// New reading if it differs from the one last shown
    pub fn update(&mut self, now: Millis) -> Option<TimerReading> {
        let reading = self.reading(now);
        if self.shown == Some(reading) {
            return None;
        }
        self.shown = Some(reading);
        Some(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mmss(minutes: u8, seconds: u8) -> TimerReading {
        TimerReading { minutes, seconds }
    }

    #[test]
    fn test_zero_before_start() {
        let mut timer = FlushTimer::default();
        timer.start(10_000);
        assert_eq!(timer.reading(0), mmss(0, 0));
        assert_eq!(timer.reading(9_999), mmss(0, 0));
        assert_eq!(timer.reading(11_000), mmss(0, 1));
    }

    #[test]
    fn test_minutes_and_rollover() {
        let mut timer = FlushTimer::default();
        timer.start(0);
        assert_eq!(timer.reading(61_500), mmss(1, 1));
        assert_eq!(timer.reading(98 * 60_000 + 59_000), mmss(98, 59));
        assert_eq!(timer.reading(99 * 60_000), mmss(0, 0));
    }

    #[test]
    fn test_update_only_on_change() {
        let mut timer = FlushTimer::default();
        timer.start(0);
        assert_eq!(timer.update(0), Some(mmss(0, 0)));
        assert_eq!(timer.update(500), None);
        assert_eq!(timer.update(1_000), Some(mmss(0, 1)));
        assert_eq!(timer.update(1_999), None);

        timer.stop();
        assert_eq!(timer.update(5_000), Some(mmss(0, 0)));
        assert_eq!(timer.update(6_000), None);
    }
}
