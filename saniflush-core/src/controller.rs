//! Flush controller
//!
//! Owns every piece of workflow state and advances it in a fixed order on
//! each tick:
//!
//! 1. relay retirement
//! 2. animation advancement (may energize relays and start captures)
//! 3. queued capture requests
//! 4. timers, counters and the periodic counter validation
//! 5. workflow thresholds (may set animation latches for the next tick)
//!
//! Nothing here blocks except the first request of a dual capture, which
//! is bounded by the capture service's own timeout.

use heapless::Vec;

use crate::animation::{AnimationKind, AnimationMachine};
use crate::capture::{CaptureConfig, CaptureCoordinator};
use crate::geometry::{circle_contains, Point, START_STOP_BUTTON};
use crate::relay::{RelayController, RELAY_COUNT};
use crate::state::{ControlEvent, WorkflowState};
use crate::traits::{
    Clock, CounterSnapshot, PhotoCaptureService, PresentationSurface, RelayOutput, SettingsStore,
};
use crate::workflow::{WorkflowEvent, WorkflowScheduler, MAX_WORKFLOW_EVENTS};
use crate::Millis;

/// How often counters are audited and re-sent to the display
pub const VALIDATION_INTERVAL_MS: u64 = 1000;

/// Top-level owner of relays, animations, scheduler and captures
pub struct FlushController<R> {
    relays: RelayController<R>,
    animations: AnimationMachine,
    scheduler: WorkflowScheduler,
    capture: CaptureCoordinator,
    state: WorkflowState,
    last_validation_at: Millis,
    /// Counts last sent to the display, `since_start_ms` ignored
    shown_counts: Option<(u32, u32, u32)>,
}

impl<R: RelayOutput> FlushController<R> {
    pub fn new(outputs: [R; RELAY_COUNT], capture: CaptureConfig) -> Self {
        Self {
            relays: RelayController::new(outputs),
            animations: AnimationMachine::new(),
            scheduler: WorkflowScheduler::new(),
            capture: CaptureCoordinator::new(capture),
            state: WorkflowState::Idle,
            last_validation_at: 0,
            shown_counts: None,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn relays(&self) -> &RelayController<R> {
        &self.relays
    }

    pub fn animations(&self) -> &AnimationMachine {
        &self.animations
    }

    pub fn scheduler(&self) -> &WorkflowScheduler {
        &self.scheduler
    }

    pub fn capture(&self) -> &CaptureCoordinator {
        &self.capture
    }

    pub fn counters(&self, now: Millis) -> CounterSnapshot {
        self.scheduler.counters(now)
    }

    /// Apply a control event, returning the resulting state
    pub fn handle<S, P>(
        &mut self,
        event: ControlEvent,
        now: Millis,
        settings: &S,
        surface: &mut P,
    ) -> WorkflowState
    where
        S: SettingsStore + ?Sized,
        P: PresentationSurface + ?Sized,
    {
        let next = self.state.transition(event);
        match (self.state, next) {
            (WorkflowState::Idle, WorkflowState::Running) => {
                self.scheduler.start(now, settings, &mut self.animations);
                self.last_validation_at = now;
                surface.redraw_control(true);
            }
            (WorkflowState::Running, WorkflowState::Idle) => self.halt(surface),
            _ => {}
        }
        self.state = next;
        self.state
    }

    pub fn start<S, P>(&mut self, now: Millis, settings: &S, surface: &mut P) -> WorkflowState
    where
        S: SettingsStore + ?Sized,
        P: PresentationSurface + ?Sized,
    {
        self.handle(ControlEvent::Start, now, settings, surface)
    }

    pub fn stop<S, P>(&mut self, now: Millis, settings: &S, surface: &mut P) -> WorkflowState
    where
        S: SettingsStore + ?Sized,
        P: PresentationSurface + ?Sized,
    {
        self.handle(ControlEvent::Stop, now, settings, surface)
    }

    /// Start/stop button
    pub fn toggle<S, P>(&mut self, now: Millis, settings: &S, surface: &mut P) -> WorkflowState
    where
        S: SettingsStore + ?Sized,
        P: PresentationSurface + ?Sized,
    {
        self.handle(ControlEvent::Toggle, now, settings, surface)
    }

    /// Toggle if the touch lands on the start/stop button
    ///
    /// Returns `None` for a touch anywhere else.
    pub fn touch<S, P>(
        &mut self,
        at: Point,
        now: Millis,
        settings: &S,
        surface: &mut P,
    ) -> Option<WorkflowState>
    where
        S: SettingsStore + ?Sized,
        P: PresentationSurface + ?Sized,
    {
        circle_contains(&START_STOP_BUTTON, at).then(|| self.toggle(now, settings, surface))
    }

    /// Stop everything within this call
    fn halt<P: PresentationSurface + ?Sized>(&mut self, surface: &mut P) {
        self.relays.deactivate_all();
        self.animations.reset();
        self.capture.cancel_all();
        self.scheduler.stop();
        surface.redraw_control(false);
    }

    /// Advance every component once
    ///
    /// `clock` is read after a blocking camera request to time the second one.
    pub fn tick<S, P, C, K>(
        &mut self,
        now: Millis,
        settings: &S,
        surface: &mut P,
        service: &mut C,
        clock: &K,
    ) -> Vec<WorkflowEvent, MAX_WORKFLOW_EVENTS>
    where
        S: SettingsStore + ?Sized,
        P: PresentationSurface + ?Sized,
        C: PhotoCaptureService + ?Sized,
        K: Clock + ?Sized,
    {
        self.relays.tick(now);

        let completed = self
            .animations
            .tick(now, settings, &mut self.relays, surface);
        for done in completed {
            if done.kind == AnimationKind::Camera {
                self.capture.begin_dual_capture(done.side, service, clock);
            }
        }

        self.capture.tick(now, service);

        self.bookkeeping(now, surface);

        self.scheduler.tick(now, settings, &mut self.animations)
    }

    fn bookkeeping<P: PresentationSurface + ?Sized>(&mut self, now: Millis, surface: &mut P) {
        self.scheduler.update_timers(now, surface);

        let mut resync = false;
        if now.saturating_sub(self.last_validation_at) >= VALIDATION_INTERVAL_MS {
            self.last_validation_at = now;
            if self.scheduler.validate_counters() {
                log_warn!("flush counters corrected");
            }
            resync = true;
        }

        let counters = self.scheduler.counters(now);
        let counts = (counters.flush_count, counters.left, counters.right);
        if resync || self.shown_counts != Some(counts) {
            self.shown_counts = Some(counts);
            surface.redraw_counters(&counters);
        }
    }
}
