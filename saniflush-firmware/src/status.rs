//! Status output over defmt
//!
//! Stands in for the touch display: every redraw becomes a log line.

use defmt::*;

use saniflush_core::animation::AnimationKind;
use saniflush_core::traits::{CounterSnapshot, PresentationSurface, TimerReading};
use saniflush_core::Side;

#[derive(Debug, Default)]
pub struct LogSurface;

impl PresentationSurface for LogSurface {
    fn redraw(&mut self, kind: AnimationKind, side: Side, stage: u8) {
        trace!("{} {} stage {}", side, kind, stage);
    }

    fn redraw_counters(&mut self, counters: &CounterSnapshot) {
        info!(
            "flushes {} (left {}, right {}) running {}s",
            counters.flush_count,
            counters.left,
            counters.right,
            counters.since_start_ms / 1000
        );
    }

    fn redraw_timer(&mut self, side: Side, reading: TimerReading) {
        debug!("{} timer {=u8:02}:{=u8:02}", side, reading.minutes, reading.seconds);
    }

    fn redraw_control(&mut self, running: bool) {
        if running {
            info!("workflow running");
        } else {
            info!("workflow stopped");
        }
    }

    fn redraw_bowl(&mut self, side: Side, refilled: bool) {
        trace!("{} bowl refilled={}", side, refilled);
    }
}
