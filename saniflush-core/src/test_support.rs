//! Shared test doubles

use core::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use crate::animation::AnimationKind;
use crate::traits::{
    CaptureError, CaptureRequest, CaptureStatus, Clock, CounterSnapshot, PhotoCaptureService,
    PresentationSurface, RelayOutput, TimerReading,
};
use crate::{Millis, Side};

/// Clock the test sets by hand; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<Millis>>);

impl ManualClock {
    pub fn at(now: Millis) -> Self {
        let clock = Self::default();
        clock.set(now);
        clock
    }

    pub fn set(&self, now: Millis) {
        self.0.set(now);
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.0.get()
    }
}

/// Relay output that counts hardware writes
#[derive(Debug, Default)]
pub struct MockRelay {
    pub on: bool,
    pub writes: u32,
}

impl RelayOutput for MockRelay {
    fn set_energized(&mut self, on: bool) {
        self.on = on;
        self.writes += 1;
    }

    fn is_energized(&self) -> bool {
        self.on
    }
}

/// Surface that records every draw call
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub frames: Vec<(AnimationKind, Side, u8)>,
    pub counters: Vec<CounterSnapshot>,
    pub timers: Vec<(Side, TimerReading)>,
    pub controls: Vec<bool>,
    pub bowls: Vec<(Side, bool)>,
}

impl PresentationSurface for RecordingSurface {
    fn redraw(&mut self, kind: AnimationKind, side: Side, stage: u8) {
        self.frames.push((kind, side, stage));
    }

    fn redraw_counters(&mut self, counters: &CounterSnapshot) {
        self.counters.push(*counters);
    }

    fn redraw_timer(&mut self, side: Side, reading: TimerReading) {
        self.timers.push((side, reading));
    }

    fn redraw_control(&mut self, running: bool) {
        self.controls.push(running);
    }

    fn redraw_bowl(&mut self, side: Side, refilled: bool) {
        self.bowls.push((side, refilled));
    }
}

/// Capture service answering from a script, `Ok("ok")` once it runs dry
#[derive(Debug, Default)]
pub struct ScriptedCapture {
    pub requests: Vec<CaptureRequest>,
    pub replies: VecDeque<Result<CaptureStatus, CaptureError>>,
    /// Each request moves this clock forward by the given time
    pub latency: Option<(ManualClock, u64)>,
}

impl ScriptedCapture {
    pub fn failing(times: usize, error: CaptureError) -> Self {
        Self {
            replies: (0..times).map(|_| Err(error)).collect(),
            ..Default::default()
        }
    }

    /// Every request takes `ms` on `clock`
    pub fn slow(clock: &ManualClock, ms: u64) -> Self {
        Self {
            latency: Some((clock.clone(), ms)),
            ..Default::default()
        }
    }
}

impl PhotoCaptureService for ScriptedCapture {
    fn capture(&mut self, request: &CaptureRequest) -> Result<CaptureStatus, CaptureError> {
        self.requests.push(request.clone());
        if let Some((clock, ms)) = &self.latency {
            clock.advance(*ms);
        }
        self.replies.pop_front().unwrap_or_else(|| {
            let mut status = CaptureStatus::new();
            let _ = status.push_str("ok");
            Ok(status)
        })
    }
}
