//! Workflow-wide counters

use crate::{Millis, Side};

/// Run flag and flush counters shared by both sides
///
/// Counters start at zero and survive stop/start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WorkflowGlobalState {
    pub running: bool,
    pub started_at: Millis,
    /// Completed flushes across both sides
    pub flush_count: u32,
    pub left_flush_count: u32,
    pub right_flush_count: u32,
}

impl WorkflowGlobalState {
    /// Count a completed flush, returning the new global count
    pub fn record_completion(&mut self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_flush_count = self.left_flush_count.saturating_add(1),
            Side::Right => self.right_flush_count = self.right_flush_count.saturating_add(1),
        }
        self.flush_count = self.flush_count.saturating_add(1);
        self.flush_count
    }

    pub fn side_count(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_flush_count,
            Side::Right => self.right_flush_count,
        }
    }

    /// Pull the right counter back to the left one if it ran ahead
    ///
    /// The right side starts later, so it can never legitimately be ahead.
    /// Returns true if a correction was made.
    pub fn validate(&mut self) -> bool {
        if self.right_flush_count <= self.left_flush_count {
            return false;
        }
        log_warn!(
            "right flush count {} ahead of left {}, correcting",
            self.right_flush_count,
            self.left_flush_count
        );
        self.right_flush_count = self.left_flush_count;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_completion() {
        let mut state = WorkflowGlobalState::default();
        assert_eq!(state.record_completion(Side::Left), 1);
        assert_eq!(state.record_completion(Side::Right), 2);
        assert_eq!(state.record_completion(Side::Left), 3);
        assert_eq!(state.side_count(Side::Left), 2);
        assert_eq!(state.side_count(Side::Right), 1);
    }

    #[test]
    fn test_validate_corrects_right_down() {
        let mut state = WorkflowGlobalState::default();
        state.record_completion(Side::Right);
        state.record_completion(Side::Right);
        state.record_completion(Side::Left);

        assert!(state.validate());
        assert_eq!(state.right_flush_count, 1);
        assert_eq!(state.left_flush_count, 1);
        assert_eq!(state.flush_count, 3);
        assert!(!state.validate());
    }
}
