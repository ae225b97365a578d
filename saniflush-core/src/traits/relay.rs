//! Relay output trait

/// A single relay channel
///
/// Implementations translate the logical energized state into a pin level,
/// so active-low boards are handled below this trait.
pub trait RelayOutput {
    /// Energize (`true`) or release (`false`) the relay
    fn set_energized(&mut self, on: bool);

    /// Check if the relay is currently energized
    fn is_energized(&self) -> bool;
}
