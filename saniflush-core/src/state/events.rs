//! Operator control events

/// Inputs that change the run state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlEvent {
    Start,
    Stop,
    /// The start/stop button: start when idle, stop when running
    Toggle,
}
