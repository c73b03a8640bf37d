//! Scripted milestone pause
//!
//! `Idle -> AwaitingLanding -> PoseHeld -> Idle`
//!
//! On entry spawning stops, the scroll freezes and the forward hop is braked,
//! but gravity keeps working so the runner lands on its own, and obstacles
//! already on screen keep coming; a hazard hit in that window ends the run
//! and cancels the pause. Landing is detected by sampling the grounded flag
//! on a fixed interval. Once grounded the physics freeze, the pose swaps, and
//! a hold timer runs; its expiry puts everything back and returns the run to
//! the running phase.

use super::player::Pose;
use super::state::{GameEvent, RunPhase, RunState};
use super::timer::{Scheduler, TimerId, TimerKind};
use crate::tuning::PauseBrake;

/// Where the scripted pause currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PauseStage {
    #[default]
    Idle,
    /// Gravity on, sampling the grounded flag
    AwaitingLanding { milestone: u32, poll: TimerId },
    /// Physics frozen, pose swapped, hold timer running
    PoseHeld { milestone: u32, hold: TimerId },
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedPauseController {
    stage: PauseStage,
    /// Pauses played to the end this run
    pub completed: u32,
}

impl ScriptedPauseController {
    pub fn stage(&self) -> PauseStage {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        self.stage != PauseStage::Idle
    }

    /// Cancel whichever timer the current stage owns and go idle.
    /// Returns whether a timer was live.
    pub fn cancel(&mut self, timers: &mut Scheduler) -> bool {
        let live = match std::mem::take(&mut self.stage) {
            PauseStage::Idle => return false,
            PauseStage::AwaitingLanding { poll, .. } => timers.cancel(poll),
            PauseStage::PoseHeld { hold, .. } => timers.cancel(hold),
        };
        if live {
            log::debug!("Scripted pause timer cancelled");
        }
        live
    }
}

/// Hand control to the scripted pause for a milestone
pub(crate) fn enter(state: &mut RunState, milestone: u32) {
    if state.phase != RunPhase::Running || state.pause.is_active() {
        return;
    }

    log::info!("Milestone {milestone} reached, scripted pause begins");
    state.phase = RunPhase::ScriptedPause;
    state.spawner.suspend(&mut state.timers);
    if state.tuning.pause_brake == PauseBrake::Instant {
        state.player.vel.x = 0.0;
    }

    let poll = state
        .timers
        .every(TimerKind::GroundPoll, state.tuning.ground_poll_ms);
    state.pause.stage = PauseStage::AwaitingLanding { milestone, poll };
    state.emit(GameEvent::ScriptedPauseStarted { milestone });
}

/// Slow the forward hop while waiting to land (decay policy only)
pub(crate) fn apply_brake(state: &mut RunState, dt: f32) {
    if !matches!(state.pause.stage, PauseStage::AwaitingLanding { .. }) {
        return;
    }
    if let PauseBrake::Decay { per_second } = state.tuning.pause_brake {
        let vx = state.player.vel.x;
        let step = per_second * dt;
        state.player.vel.x = if vx.abs() <= step {
            0.0
        } else {
            vx - step * vx.signum()
        };
    }
}

/// One grounded sample
pub(crate) fn on_ground_poll(state: &mut RunState, id: TimerId) {
    let PauseStage::AwaitingLanding { milestone, poll } = state.pause.stage else {
        return;
    };
    if poll != id || !state.is_grounded() {
        return;
    }

    state.timers.cancel(poll);

    state.physics_paused = true;
    let player = &mut state.player;
    player.vel.y = 0.0;
    player.vel.x = 0.0;
    player.gravity_enabled = false;
    player.pose = Pose::Squatting;
    player.pos.y += state.tuning.pose_offset;

    let hold = state
        .timers
        .after(TimerKind::PoseHold, state.tuning.pose_hold_ms);
    state.pause.stage = PauseStage::PoseHeld { milestone, hold };
    state.emit(GameEvent::PoseChanged(Pose::Squatting));
    log::debug!("Landed, holding pose for {} ms", state.tuning.pose_hold_ms);
}

/// Hold timer expiry: restore and resume the run
pub(crate) fn on_hold_expired(state: &mut RunState, id: TimerId) {
    let PauseStage::PoseHeld { milestone, hold } = state.pause.stage else {
        return;
    };
    if hold != id {
        return;
    }
    state.pause.stage = PauseStage::Idle;

    let player = &mut state.player;
    player.pos.y -= state.tuning.pose_offset;
    player.pose = Pose::Running;
    player.gravity_enabled = true;
    state.physics_paused = false;
    state.emit(GameEvent::PoseChanged(Pose::Running));

    if state.phase == RunPhase::ScriptedPause {
        state.phase = RunPhase::Running;
        state.spawner.resume(&mut state.timers);
    }
    state.pause.completed += 1;
    state.emit(GameEvent::ScriptedPauseEnded { milestone });
    log::info!("Scripted pause for milestone {milestone} over");
}
