//! Workflow scheduler
//!
//! Drives both sides through their flush cycles:
//!
//! ```text
//!            start (left)             elapsed >= repeat, gap == 0
//!   Idle ───────────────────► Flushing ◄──────────────┐
//!     │                         │   │                 │
//!     │ start (right, delay)    │   └─────────────────┘
//!     ▼                         │ elapsed >= repeat, gap > 0
//!   Armed ◄─────────────────────┘
//!     │ now >= start_at
//!     └──────────────────────► Flushing
//! ```
//!
//! Every threshold is read from the settings on each tick, so edits take
//! effect on the running cycle.

use heapless::Vec;

use super::cycle::FlushCycle;
use super::state::WorkflowGlobalState;
use super::timer::FlushTimer;
use crate::animation::{AnimationKind, AnimationMachine};
use crate::traits::{CounterSnapshot, PresentationSurface, SettingsStore};
use crate::{Millis, Side};

/// Most events a single tick can produce (six per side)
///
/// An armed start, waste dose, completion, camera schedule, continuous
/// restart and camera trigger can all land on the same tick.
pub const MAX_WORKFLOW_EVENTS: usize = 12;

/// Things that happened during a scheduler tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WorkflowEvent {
    CycleStarted { side: Side },
    WasteRepoTriggered { side: Side },
    CycleCompleted { side: Side, flush_count: u32 },
    CameraScheduled { side: Side, due_at: Millis },
    CameraTriggered { side: Side },
}

type Events = Vec<WorkflowEvent, MAX_WORKFLOW_EVENTS>;

/// Owner of both flush cycles and the global counters
#[derive(Debug, Default)]
pub struct WorkflowScheduler {
    cycles: [FlushCycle; 2],
    timers: [FlushTimer; 2],
    state: WorkflowGlobalState,
}

impl WorkflowScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn state(&self) -> &WorkflowGlobalState {
        &self.state
    }

    pub fn cycle(&self, side: Side) -> &FlushCycle {
        &self.cycles[side.index()]
    }

    /// Start the workflow
    ///
    /// The left side starts flushing at once; the right side waits out its
    /// start delay. Returns false (and does nothing) if already running.
    pub fn start<S>(&mut self, now: Millis, settings: &S, anims: &mut AnimationMachine) -> bool
    where
        S: SettingsStore + ?Sized,
    {
        if self.state.running {
            return false;
        }

        self.state.running = true;
        self.state.started_at = now;
        log_info!("workflow started");

        let mut events = Events::new();
        self.begin_cycle(Side::Left, now, anims, &mut events);
        self.timers[Side::Left.index()].start(now);

        let delay_ms = u64::from(settings.right_toilet_flush_delay_s()) * 1000;
        let right_at = now.saturating_add(delay_ms);
        if delay_ms == 0 {
            self.begin_cycle(Side::Right, now, anims, &mut events);
        } else {
            self.cycles[Side::Right.index()].arm_at(right_at);
            log_debug!("right side armed for {}", right_at);
        }
        self.timers[Side::Right.index()].start(right_at);

        true
    }

    /// Stop both sides
    ///
    /// Cycles, pending starts and camera triggers are dropped; counters
    /// are kept.
    pub fn stop(&mut self) {
        self.state.running = false;
        for (cycle, timer) in self.cycles.iter_mut().zip(self.timers.iter_mut()) {
            cycle.stop();
            timer.stop();
        }
        log_info!("workflow stopped");
    }

    /// Evaluate every time threshold for both sides
    pub fn tick<S>(&mut self, now: Millis, settings: &S, anims: &mut AnimationMachine) -> Events
    where
        S: SettingsStore + ?Sized,
    {
        let mut events = Events::new();
        if !self.state.running {
            return events;
        }

        for side in Side::ALL {
            self.tick_side(side, now, settings, anims, &mut events);
        }
        events
    }

    fn tick_side<S>(
        &mut self,
        side: Side,
        now: Millis,
        settings: &S,
        anims: &mut AnimationMachine,
        events: &mut Events,
    ) where
        S: SettingsStore + ?Sized,
    {
        let i = side.index();

        if self.cycles[i].start_due(now) {
            self.begin_cycle(side, now, anims, events);
        }

        if self.cycles[i].active {
            let elapsed = self.cycles[i].elapsed(now);

            if !self.cycles[i].waste_repo_triggered
                && elapsed >= settings.waste_repo_trigger_delay_ms()
            {
                self.cycles[i].waste_repo_triggered = true;
                anims.trigger(AnimationKind::WasteRepo, side);
                log_debug!("{} waste dose triggered", side);
                let _ = events.push(WorkflowEvent::WasteRepoTriggered { side });
            }

            if elapsed >= settings.flush_workflow_repeat_ms() {
                self.complete_cycle(side, now, settings, anims, events);
            }
        }

        if let Some(due) = self.cycles[i].camera_due_at {
            if now >= due {
                self.cycles[i].camera_due_at = None;
                anims.trigger(AnimationKind::Camera, side);
                log_debug!("{} camera triggered", side);
                let _ = events.push(WorkflowEvent::CameraTriggered { side });
            }
        }
    }

    fn begin_cycle(
        &mut self,
        side: Side,
        now: Millis,
        anims: &mut AnimationMachine,
        events: &mut Events,
    ) {
        self.cycles[side.index()].start(now);
        anims.trigger(AnimationKind::Toilet, side);
        log_debug!("{} cycle started at {}", side, now);
        let _ = events.push(WorkflowEvent::CycleStarted { side });
    }

    fn complete_cycle<S>(
        &mut self,
        side: Side,
        now: Millis,
        settings: &S,
        anims: &mut AnimationMachine,
        events: &mut Events,
    ) where
        S: SettingsStore + ?Sized,
    {
        let flush_count = self.state.record_completion(side);
        self.cycles[side.index()].active = false;
        log_info!("{} flush complete, total {}", side, flush_count);
        let _ = events.push(WorkflowEvent::CycleCompleted { side, flush_count });

        let every = settings.pic_every_n_flushes();
        if every > 0 && flush_count % every == 0 {
            let due_at = now.saturating_add(settings.camera_trigger_after_flush_ms());
            self.cycles[side.index()].camera_due_at = Some(due_at);
            let _ = events.push(WorkflowEvent::CameraScheduled { side, due_at });
        }

        match settings.flush_cycle_gap_ms() {
            0 => self.begin_cycle(side, now, anims, events),
            gap => self.cycles[side.index()].arm_at(now.saturating_add(gap)),
        }
    }

    /// Correct counter drift; returns true if anything changed
    pub fn validate_counters(&mut self) -> bool {
        self.state.validate()
    }

    pub fn counters(&self, now: Millis) -> CounterSnapshot {
        CounterSnapshot {
            flush_count: self.state.flush_count,
            left: self.state.left_flush_count,
            right: self.state.right_flush_count,
            since_start_ms: if self.state.running {
                now.saturating_sub(self.state.started_at)
            } else {
                0
            },
        }
    }

    /// Redraw the side timers whose displayed value changed
    pub fn update_timers<P: PresentationSurface + ?Sized>(&mut self, now: Millis, surface: &mut P) {
        for side in Side::ALL {
            if let Some(reading) = self.timers[side.index()].update(now) {
                surface.redraw_timer(side, reading);
            }
        }
    }
}
