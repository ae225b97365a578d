//! Run state of the flush controller
//!
//! Two states and a single start/stop control: the whole machine is
//! either idle or running both toilets.

pub mod events;
pub mod machine;

pub use events::ControlEvent;
pub use machine::WorkflowState;
