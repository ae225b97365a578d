//! Animation state machine
//!
//! Each (kind, side) pair has an [`AnimationState`] and a one-shot latch.
//! The scheduler sets latches; a latched, idle animation is armed on the
//! next tick together with the relay it mirrors. When the stage counter
//! reaches its bound the animation resets and its latch is cleared in the
//! same step. That clearing is the completion signal.

use heapless::Vec;

use super::kind::{AnimationKind, ArmSequence, ANIMATION_KIND_COUNT};
use crate::relay::RelayController;
use crate::traits::{PresentationSurface, RelayOutput, SettingsStore};
use crate::{Millis, Side};

/// Most completions a single tick can produce
pub const MAX_COMPLETIONS: usize = ANIMATION_KIND_COUNT * 2;

/// Progress of one animation instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimationState {
    /// Current stage, always below the kind's stage bound
    pub stage: u8,
    pub last_stage_change_at: Millis,
    pub active: bool,
    pub armed_at: Millis,
    /// Completion is held back until this much time has passed since arming
    pub min_run_ms: u64,
    /// Number of times the stage loop wrapped while waiting on `min_run_ms`
    pub replays: u8,
}

/// An animation reached its end on this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimationComplete {
    pub kind: AnimationKind,
    pub side: Side,
}

/// All animation instances and their trigger latches
#[derive(Debug, Default)]
pub struct AnimationMachine {
    states: [[AnimationState; 2]; ANIMATION_KIND_COUNT],
    latches: [[bool; 2]; ANIMATION_KIND_COUNT],
    /// Which bowl sequence (flush or dose) ran last on each side
    last_bowl_sequence: [Option<AnimationKind>; 2],
}

impl AnimationMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the one-shot latch for `kind` on `side`
    ///
    /// Returns false if the latch was already set; the request is absorbed.
    pub fn trigger(&mut self, kind: AnimationKind, side: Side) -> bool {
        let latch = &mut self.latches[kind.index()][side.index()];
        let fresh = !*latch;
        *latch = true;
        fresh
    }

    pub fn is_latched(&self, kind: AnimationKind, side: Side) -> bool {
        self.latches[kind.index()][side.index()]
    }

    pub fn state(&self, kind: AnimationKind, side: Side) -> &AnimationState {
        &self.states[kind.index()][side.index()]
    }

    pub fn is_active(&self, kind: AnimationKind, side: Side) -> bool {
        self.state(kind, side).active
    }

    pub fn any_active(&self) -> bool {
        self.states.iter().flatten().any(|s| s.active)
    }

    /// Flush or dose, whichever armed last on `side`
    pub fn last_bowl_sequence(&self, side: Side) -> Option<AnimationKind> {
        self.last_bowl_sequence[side.index()]
    }

    /// Start a sequence and energize its relay
    ///
    /// Does nothing and returns false if the animation is already running.
    pub fn arm<R, P>(
        &mut self,
        seq: ArmSequence,
        now: Millis,
        relays: &mut RelayController<R>,
        surface: &mut P,
    ) -> bool
    where
        R: RelayOutput,
        P: PresentationSurface + ?Sized,
    {
        let state = &mut self.states[seq.kind.index()][seq.side.index()];
        if state.active {
            return false;
        }

        *state = AnimationState {
            stage: 0,
            last_stage_change_at: now,
            active: true,
            armed_at: now,
            min_run_ms: match seq.kind {
                AnimationKind::WasteRepo => seq.hold_ms,
                _ => 0,
            },
            replays: 0,
        };

        if matches!(seq.kind, AnimationKind::Toilet | AnimationKind::WasteRepo) {
            self.last_bowl_sequence[seq.side.index()] = Some(seq.kind);
        }
        if let Some(relay) = seq.relay {
            relays.activate(relay, seq.hold_ms, now);
        }

        log_debug!("{} {} armed", seq.kind, seq.side);
        surface.redraw(seq.kind, seq.side, 0);
        true
    }

    /// Arm latched sequences and advance running ones
    pub fn tick<S, R, P>(
        &mut self,
        now: Millis,
        settings: &S,
        relays: &mut RelayController<R>,
        surface: &mut P,
    ) -> Vec<AnimationComplete, MAX_COMPLETIONS>
    where
        S: SettingsStore + ?Sized,
        R: RelayOutput,
        P: PresentationSurface + ?Sized,
    {
        let mut done = Vec::new();

        for kind in AnimationKind::ALL {
            for side in Side::ALL {
                if self.is_latched(kind, side) && !self.is_active(kind, side) {
                    let seq = ArmSequence::for_kind(kind, side, settings);
                    self.arm(seq, now, relays, surface);
                }

                if self.advance(kind, side, now, surface) {
                    self.finish(kind, side, surface);
                    // capacity covers every (kind, side) pair
                    let _ = done.push(AnimationComplete { kind, side });
                }
            }
        }

        done
    }

    /// Step one instance, returning true when it has completed
    fn advance<P>(&mut self, kind: AnimationKind, side: Side, now: Millis, surface: &mut P) -> bool
    where
        P: PresentationSurface + ?Sized,
    {
        let state = &mut self.states[kind.index()][side.index()];
        if !state.active {
            return false;
        }

        let running_for = now.saturating_sub(state.armed_at);

        // Replaying while the pump runs: stop as soon as it is done
        if state.replays > 0 && running_for >= state.min_run_ms {
            return true;
        }

        if now.saturating_sub(state.last_stage_change_at) < kind.stage_duration_ms() {
            return false;
        }

        state.stage += 1;
        state.last_stage_change_at = now;

        if state.stage < kind.total_stages() {
            surface.redraw(kind, side, state.stage);
            return false;
        }

        if running_for < state.min_run_ms {
            state.stage = 0;
            state.replays = state.replays.saturating_add(1);
            surface.redraw(kind, side, 0);
            return false;
        }

        true
    }

    fn finish<P>(&mut self, kind: AnimationKind, side: Side, surface: &mut P)
    where
        P: PresentationSurface + ?Sized,
    {
        self.states[kind.index()][side.index()] = AnimationState::default();
        self.latches[kind.index()][side.index()] = false;

        log_debug!("{} {} complete", kind, side);
        surface.redraw(kind, side, 0);
        if kind != AnimationKind::Camera {
            let refilled = self.last_bowl_sequence(side) == Some(AnimationKind::WasteRepo);
            surface.redraw_bowl(side, refilled);
        }
    }

    /// Drop every running animation and latch
    pub fn reset(&mut self) {
        self.states = Default::default();
        self.latches = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlushSettings;
    use crate::relay::RelayId;
    use crate::test_support::{MockRelay, RecordingSurface};
    use proptest::prelude::*;

    struct Rig {
        machine: AnimationMachine,
        relays: RelayController<MockRelay>,
        surface: RecordingSurface,
        settings: FlushSettings,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                machine: AnimationMachine::new(),
                relays: RelayController::new(Default::default()),
                surface: RecordingSurface::default(),
                settings: FlushSettings::default(),
            }
        }

        fn tick(&mut self, now: Millis) -> Vec<AnimationComplete, MAX_COMPLETIONS> {
            self.relays.tick(now);
            self.machine
                .tick(now, &self.settings, &mut self.relays, &mut self.surface)
        }
    }

    #[test]
    fn test_latch_arms_on_next_tick() {
        let mut rig = Rig::new();
        assert!(rig.machine.trigger(AnimationKind::Toilet, Side::Left));
        assert!(!rig.machine.is_active(AnimationKind::Toilet, Side::Left));

        rig.tick(100);
        assert!(rig.machine.is_active(AnimationKind::Toilet, Side::Left));
        assert!(rig.relays.is_active(RelayId::ValveLeft));
        assert_eq!(rig.relays.channel(RelayId::ValveLeft).hold_ms, 2000);
    }

    #[test]
    fn test_duplicate_trigger_is_absorbed() {
        let mut rig = Rig::new();
        assert!(rig.machine.trigger(AnimationKind::Camera, Side::Right));
        assert!(!rig.machine.trigger(AnimationKind::Camera, Side::Right));
    }

    #[test]
    fn test_toilet_runs_four_stages_then_clears_latch() {
        let mut rig = Rig::new();
        rig.machine.trigger(AnimationKind::Toilet, Side::Left);
        rig.tick(0);

        for (i, now) in [500, 1000, 1500].into_iter().enumerate() {
            assert!(rig.tick(now).is_empty());
            assert_eq!(
                rig.machine.state(AnimationKind::Toilet, Side::Left).stage,
                i as u8 + 1
            );
        }

        let done = rig.tick(2000);
        assert_eq!(
            done.as_slice(),
            &[AnimationComplete {
                kind: AnimationKind::Toilet,
                side: Side::Left
            }]
        );
        assert!(!rig.machine.is_active(AnimationKind::Toilet, Side::Left));
        assert!(!rig.machine.is_latched(AnimationKind::Toilet, Side::Left));
        assert_eq!(rig.surface.bowls.last(), Some(&(Side::Left, false)));
    }

    #[test]
    fn test_stage_waits_for_duration() {
        let mut rig = Rig::new();
        rig.machine.trigger(AnimationKind::WasteRepo, Side::Right);
        rig.tick(0);
        rig.tick(399);
        assert_eq!(rig.machine.state(AnimationKind::WasteRepo, Side::Right).stage, 0);
        rig.tick(400);
        assert_eq!(rig.machine.state(AnimationKind::WasteRepo, Side::Right).stage, 1);
    }

    #[test]
    fn test_arm_while_active_is_ignored() {
        let mut rig = Rig::new();
        let seq = ArmSequence::for_kind(AnimationKind::Toilet, Side::Left, &rig.settings);
        assert!(rig.machine.arm(seq, 0, &mut rig.relays, &mut rig.surface));
        rig.tick(500);
        assert!(!rig.machine.arm(seq, 600, &mut rig.relays, &mut rig.surface));
        assert_eq!(rig.machine.state(AnimationKind::Toilet, Side::Left).stage, 1);
        assert_eq!(rig.relays.channel(RelayId::ValveLeft).activated_at, 0);
    }

    #[test]
    fn test_waste_repo_replays_until_pump_done() {
        let mut rig = Rig::new();
        rig.settings.pump_dose_ml = 150; // 3000 ms at 50 ml/s
        rig.machine.trigger(AnimationKind::WasteRepo, Side::Left);
        rig.tick(0);

        let mut now = 0;
        let mut completed_at = None;
        while now < 10_000 {
            now += 100;
            if !rig.tick(now).is_empty() {
                completed_at = Some(now);
                break;
            }
        }

        assert_eq!(completed_at, Some(3000));
        assert!(!rig.relays.is_active(RelayId::PumpLeft));
        assert_eq!(rig.surface.bowls.last(), Some(&(Side::Left, true)));
    }

    #[test]
    fn test_short_dose_still_plays_every_stage() {
        let mut rig = Rig::new();
        rig.settings.pump_dose_ml = 50; // 1000 ms
        rig.machine.trigger(AnimationKind::WasteRepo, Side::Left);
        rig.tick(0);

        for now in (100..2000).step_by(100) {
            assert!(rig.tick(now).is_empty());
        }
        assert!(!rig.relays.is_active(RelayId::PumpLeft));
        assert!(rig.machine.is_active(AnimationKind::WasteRepo, Side::Left));
        assert_eq!(rig.tick(2000).len(), 1);
    }

    #[test]
    fn test_pump_retires_at_dose_duration() {
        let mut rig = Rig::new();
        rig.machine.trigger(AnimationKind::WasteRepo, Side::Right);
        rig.tick(0);

        for now in (100..2000).step_by(100) {
            rig.tick(now);
            assert!(rig.relays.is_active(RelayId::PumpRight));
        }
        rig.tick(2000);
        assert!(!rig.relays.is_active(RelayId::PumpRight));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut rig = Rig::new();
        rig.machine.trigger(AnimationKind::Toilet, Side::Left);
        rig.machine.trigger(AnimationKind::Camera, Side::Right);
        rig.tick(0);
        assert!(rig.machine.any_active());

        rig.machine.reset();
        assert!(!rig.machine.any_active());
        for kind in AnimationKind::ALL {
            for side in Side::ALL {
                assert!(!rig.machine.is_latched(kind, side));
            }
        }
    }

    fn kind_strategy() -> impl Strategy<Value = AnimationKind> {
        prop_oneof![
            Just(AnimationKind::Toilet),
            Just(AnimationKind::Camera),
            Just(AnimationKind::WasteRepo),
        ]
    }

    proptest! {
        #[test]
        fn prop_stages_visited_in_order(kind in kind_strategy(), t0 in 0u64..100_000, slack in 0u64..50) {
            let mut rig = Rig::new();
            let seq = ArmSequence::for_kind(kind, Side::Left, &rig.settings);
            rig.machine.arm(seq, t0, &mut rig.relays, &mut rig.surface);

            let n = kind.total_stages();
            let s = kind.stage_duration_ms() + slack;
            let mut now = t0;
            for expected in 1..n {
                now += s;
                prop_assert!(rig.tick(now).is_empty());
                prop_assert_eq!(rig.machine.state(kind, Side::Left).stage, expected);
            }

            now += s;
            let done = rig.tick(now);
            prop_assert_eq!(done.len(), 1);
            let state = rig.machine.state(kind, Side::Left);
            prop_assert_eq!(state.stage, 0);
            prop_assert!(!state.active);

            let stages: std::vec::Vec<u8> = rig
                .surface
                .frames
                .iter()
                .filter(|f| f.0 == kind)
                .map(|f| f.2)
                .collect();
            let mut expected: std::vec::Vec<u8> = (0..n).collect();
            expected.push(0);
            prop_assert_eq!(stages, expected);
        }
    }
}
