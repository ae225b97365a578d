//! Per-side flush workflow
//!
//! The scheduler owns one [`FlushCycle`] per side plus the global counters.
//! It never touches relays directly: it sets animation latches, and the
//! animation arm path energizes the matching relay.

mod cycle;
mod scheduler;
mod state;
mod timer;

pub use cycle::{CyclePhase, FlushCycle};
pub use scheduler::{WorkflowEvent, WorkflowScheduler, MAX_WORKFLOW_EVENTS};
pub use state::WorkflowGlobalState;
pub use timer::{FlushTimer, TIMER_ROLLOVER_MIN};
