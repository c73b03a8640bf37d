//! Fixed timestep run tick
//!
//! The run state machine. Each step runs in a fixed order:
//! input, difficulty clock, player physics, obstacle motion and culling,
//! timers (spawn, grounded poll, pose hold), then overlap resolution.

use super::collision::{self, CollisionOutcome};
use super::obstacle::{ObstacleId, ObstacleKind, Removal};
use super::pause;
use super::state::{Cue, GameEvent, Prompt, RunPhase, RunState};
use super::timer::{Fired, TimerKind};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer press or the jump key: start, jump, or restart
    pub primary_action: bool,
    /// Demo mode - a bot presses the button
    pub autopilot: bool,
}

/// Advance the run by one step of `dt_ms` milliseconds
pub fn tick(state: &mut RunState, input: &TickInput, dt_ms: f32) {
    let mut primary = input.primary_action;
    if input.autopilot && !primary {
        primary = autopilot_wants_action(state);
    }
    if primary {
        primary_action(state);
    }

    let dt = dt_ms / 1000.0;

    match state.phase {
        RunPhase::Idle | RunPhase::GameOver => return,
        RunPhase::Running => {
            state.clock.advance(dt_ms);
            let speed = state.scroll_speed();
            state.parallax.advance(dt, speed);
        }
        RunPhase::ScriptedPause => pause::apply_brake(state, dt),
    }

    if !state.physics_paused {
        let tuning = &state.tuning;
        state.player.step(dt, tuning);
    }

    // Obstacles keep coming until the pause pose is struck
    let obstacles_live = state.obstacles_live();
    if obstacles_live {
        for id in state.obstacles.tick(dt) {
            state.emit(GameEvent::Removed {
                id,
                reason: Removal::Culled,
            });
        }
    }
    if state.phase == RunPhase::Running && state.player.on_ground {
        state.emit(GameEvent::Dust { count: 1 });
    }

    for fired in state.timers.advance(dt_ms) {
        dispatch_timer(state, fired);
    }

    if obstacles_live && state.obstacles_live() {
        let player = &state.player;
        for id in state.obstacles.overlapping(player.pos, player.half_extents()) {
            on_overlap(state, id);
        }
    }

    state.obstacles.sweep();
}

/// Entry point for a host physics engine reporting a player/obstacle overlap
pub fn on_overlap(state: &mut RunState, id: ObstacleId) -> CollisionOutcome {
    collision::resolve(state, id)
}

/// Route the single logical input by phase
pub fn primary_action(state: &mut RunState) {
    match state.phase {
        RunPhase::Idle => start_run(state),
        RunPhase::Running => {
            if state.is_grounded() {
                jump(state);
            }
        }
        RunPhase::ScriptedPause => {}
        RunPhase::GameOver => {
            log::info!("Restarting after game over (run {})", state.run_number);
            state.reset_for_new_run();
            start_run(state);
        }
    }
}

fn start_run(state: &mut RunState) {
    state.score = 0;
    state.clock.reset();
    state.phase = RunPhase::Running;
    state.physics_paused = false;
    state.spawner.start(&mut state.timers);

    let run = state.run_number;
    state.emit(GameEvent::RunStarted { run });
    state.emit(GameEvent::Prompt(Prompt::Hidden));
    state.emit(GameEvent::PlayCue(Cue::Music));
    log::info!("Run {} started (seed {})", run, state.seed);

    // The first press doubles as a leap, grounded or not
    jump(state);
}

fn jump(state: &mut RunState) {
    let tuning = &state.tuning;
    state.player.apply_jump(tuning);
    state.emit(GameEvent::Jumped);
    state.emit(GameEvent::Dust { count: JUMP_DUST });
    state.emit(GameEvent::PlayCue(Cue::Jump));
}

fn dispatch_timer(state: &mut RunState, fired: Fired) {
    match fired.kind {
        TimerKind::Spawn => {
            if state.phase != RunPhase::Running || !state.spawner.owns(fired.id) {
                return;
            }
            let threshold = state.tuning.hazard_threshold;
            let kind = state.spawner.request(&mut state.rng, threshold);
            let speed = state.scroll_speed();
            let id = state.obstacles.spawn(kind, speed, &mut state.rng);
            state.emit(GameEvent::Spawned { id, kind });
            log::debug!("Spawned {:?} #{} at speed {:.1}", kind, id, speed);
        }
        TimerKind::GroundPoll => pause::on_ground_poll(state, fired.id),
        TimerKind::PoseHold => pause::on_hold_expired(state, fired.id),
    }
}

/// Demo bot: start idle runs and hop over the next hazard
fn autopilot_wants_action(state: &RunState) -> bool {
    match state.phase {
        RunPhase::Idle => true,
        RunPhase::Running if state.is_grounded() => {
            let player = &state.player;
            let reach = player.half_extents().x + HAZARD_HALF_W;
            state
                .obstacles
                .iter()
                .filter(|o| o.kind == ObstacleKind::Hazard && o.pos.x > player.pos.x)
                .any(|o| {
                    let gap = o.pos.x - player.pos.x - reach;
                    let closing = player.horizontal_nudge_velocity() - o.velocity_x;
                    closing > 0.0 && gap / closing <= AUTOPILOT_LEAD_SECS
                })
        }
        _ => false,
    }
}

/// How far ahead of contact the demo bot jumps
const AUTOPILOT_LEAD_SECS: f32 = 0.1;
