//! Animation kinds and arm sequences

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::pump_duration_ms;
use crate::relay::RelayId;
use crate::traits::SettingsStore;
use crate::Side;

pub const ANIMATION_KIND_COUNT: usize = 3;

/// Staged visual sequences, one instance per side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnimationKind {
    /// Bowl flush, drives the flush valve
    Toilet,
    /// Camera flash, hands over to capture on completion
    Camera,
    /// Waste dosing, drives the pump
    WasteRepo,
}

impl AnimationKind {
    pub const ALL: [AnimationKind; ANIMATION_KIND_COUNT] = [
        AnimationKind::Toilet,
        AnimationKind::Camera,
        AnimationKind::WasteRepo,
    ];

    pub const fn index(self) -> usize {
        match self {
            AnimationKind::Toilet => 0,
            AnimationKind::Camera => 1,
            AnimationKind::WasteRepo => 2,
        }
    }

    /// Time each stage stays on screen
    pub const fn stage_duration_ms(self) -> u64 {
        match self {
            AnimationKind::Toilet => 500,
            AnimationKind::Camera => 100,
            AnimationKind::WasteRepo => 400,
        }
    }

    /// Stage bound; stages run `0..total_stages`
    pub const fn total_stages(self) -> u8 {
        match self {
            AnimationKind::Toilet => 4,
            AnimationKind::Camera => 4,
            AnimationKind::WasteRepo => 5,
        }
    }

    /// One full pass through every stage
    pub const fn nominal_duration_ms(self) -> u64 {
        self.stage_duration_ms() * self.total_stages() as u64
    }
}

/// Start trigger shared by an animation and the relay it mirrors
///
/// Arming the animation and energizing the relay happen in one step, so the
/// picture on screen and the hardware cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ArmSequence {
    pub kind: AnimationKind,
    pub side: Side,
    pub relay: Option<RelayId>,
    /// Relay hold; for waste dosing also the minimum animation run time
    pub hold_ms: u64,
}

impl ArmSequence {
    /// Sequence for `kind` on `side` using the current settings
    pub fn for_kind<S: SettingsStore + ?Sized>(kind: AnimationKind, side: Side, settings: &S) -> Self {
        match kind {
            AnimationKind::Toilet => Self {
                kind,
                side,
                relay: Some(RelayId::valve(side)),
                hold_ms: settings.toilet_flush_relay_hold_ms(),
            },
            AnimationKind::WasteRepo => Self {
                kind,
                side,
                relay: Some(RelayId::pump(side)),
                hold_ms: pump_duration_ms(settings),
            },
            AnimationKind::Camera => Self {
                kind,
                side,
                relay: None,
                hold_ms: 0,
            },
        }
    }
}
