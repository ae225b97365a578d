//! Run state transitions

use super::events::ControlEvent;

/// Controller run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WorkflowState {
    /// Nothing scheduled, every relay off
    #[default]
    Idle,
    /// Both sides cycling
    Running,
}

impl WorkflowState {
    pub fn is_running(&self) -> bool {
        matches!(self, WorkflowState::Running)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: ControlEvent) -> Self {
        use ControlEvent::*;
        use WorkflowState::*;

        match (self, event) {
            (Idle, Start | Toggle) => Running,
            (Running, Stop | Toggle) => Idle,
            // Start while running, stop while idle
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_alternates() {
        let state = WorkflowState::Idle;
        let state = state.transition(ControlEvent::Toggle);
        assert_eq!(state, WorkflowState::Running);
        let state = state.transition(ControlEvent::Toggle);
        assert_eq!(state, WorkflowState::Idle);
    }

    #[test]
    fn test_redundant_events_keep_state() {
        assert_eq!(
            WorkflowState::Running.transition(ControlEvent::Start),
            WorkflowState::Running
        );
        assert_eq!(
            WorkflowState::Idle.transition(ControlEvent::Stop),
            WorkflowState::Idle
        );
    }
}
