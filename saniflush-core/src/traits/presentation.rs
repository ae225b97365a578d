//! Presentation surface trait
//!
//! The display is opaque to the core: it receives state and draws it.
//! Nothing it returns feeds back into timing.

use crate::animation::AnimationKind;
use crate::{Millis, Side};

/// Flush counters as shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CounterSnapshot {
    /// Completed flushes across both sides
    pub flush_count: u32,
    pub left: u32,
    pub right: u32,
    /// Time since the workflow was started, 0 while stopped
    pub since_start_ms: Millis,
}

/// Per-side run timer, mm:ss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerReading {
    pub minutes: u8,
    pub seconds: u8,
}

/// Display sink
pub trait PresentationSurface {
    /// Draw `stage` of an animation sequence
    fn redraw(&mut self, kind: AnimationKind, side: Side, stage: u8);

    /// Draw the flush counters
    fn redraw_counters(&mut self, counters: &CounterSnapshot);

    /// Draw a side's run timer
    fn redraw_timer(&mut self, _side: Side, _reading: TimerReading) {}

    /// Draw the start/stop control (triangle when idle, square when running)
    fn redraw_control(&mut self, _running: bool) {}

    /// Draw the resting toilet bowl, `refilled` after a waste dose
    fn redraw_bowl(&mut self, _side: Side, _refilled: bool) {}
}
