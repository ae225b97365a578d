//! Settings source trait

use crate::config::DEFAULT_PUMP_RATE_ML_PER_S;

/// Source of the tunable workflow thresholds
///
/// Values may change between ticks. The scheduler reads them every time it
/// evaluates a threshold and never caches them across a cycle.
pub trait SettingsStore {
    /// Length of one flush cycle
    fn flush_workflow_repeat_ms(&self) -> u64;

    /// Waste pump start, measured from cycle start
    fn waste_repo_trigger_delay_ms(&self) -> u64;

    /// Camera start, measured from cycle completion
    fn camera_trigger_after_flush_ms(&self) -> u64;

    fn waste_qty_per_flush_ml(&self) -> u32;

    /// Photograph every N completed flushes, 0 disables capture
    fn pic_every_n_flushes(&self) -> u32;

    fn right_toilet_flush_delay_s(&self) -> u32;

    fn toilet_flush_relay_hold_ms(&self) -> u64;

    fn pump_rate_ml_per_s(&self) -> u32 {
        DEFAULT_PUMP_RATE_ML_PER_S
    }

    /// Gap between a completed cycle and the next, 0 = continuous
    fn flush_cycle_gap_ms(&self) -> u64 {
        0
    }
}
