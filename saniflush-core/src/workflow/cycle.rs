//! One side's flush cycle

use crate::Millis;

/// Where a side is in its flush cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CyclePhase {
    Idle,
    /// Waiting for a delayed start (right side start delay, inter-cycle gap)
    Armed { start_at: Millis },
    Flushing,
}

/// Timing state for one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlushCycle {
    pub active: bool,
    pub started_at: Millis,
    /// One-shot latch, set once the waste dose has been triggered this cycle
    pub waste_repo_triggered: bool,
    /// Camera trigger waiting to fire after a completed cycle
    pub camera_due_at: Option<Millis>,
    pub next_start_at: Option<Millis>,
}

impl FlushCycle {
    pub fn phase(&self) -> CyclePhase {
        match (self.active, self.next_start_at) {
            (true, _) => CyclePhase::Flushing,
            (false, Some(start_at)) => CyclePhase::Armed { start_at },
            (false, None) => CyclePhase::Idle,
        }
    }

    /// Begin flushing at `now`
    ///
    /// A camera trigger scheduled by the previous cycle survives.
    pub fn start(&mut self, now: Millis) {
        self.active = true;
        self.started_at = now;
        self.waste_repo_triggered = false;
        self.next_start_at = None;
    }

    /// Start a cycle later
    pub fn arm_at(&mut self, start_at: Millis) {
        self.active = false;
        self.next_start_at = Some(start_at);
    }

    /// Whether an armed start is due
    pub fn start_due(&self, now: Millis) -> bool {
        matches!(self.phase(), CyclePhase::Armed { start_at } if now >= start_at)
    }

    pub fn elapsed(&self, now: Millis) -> Millis {
        now.saturating_sub(self.started_at)
    }

    pub fn camera_scheduled(&self) -> bool {
        self.camera_due_at.is_some()
    }

    /// Drop the cycle, including pending starts and camera triggers
    pub fn stop(&mut self) {
        *self = Self::default();
    }
}
