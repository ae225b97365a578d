//! Staged animations tied to relay sequences
//!
//! Three kinds per side: flush, camera flash and waste dosing. Flush and
//! dosing arm together with their relay; the camera flash hands over to
//! photo capture once it completes.

mod kind;
mod machine;

pub use kind::{AnimationKind, ArmSequence, ANIMATION_KIND_COUNT};
pub use machine::{AnimationComplete, AnimationMachine, AnimationState, MAX_COMPLETIONS};
