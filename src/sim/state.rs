//! Run state and the events it publishes
//!
//! A run is one owned [`RunState`]. Restarting replaces it wholesale after
//! an explicit teardown of everything it scheduled.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::clock::DifficultyClock;
use super::obstacle::{ObstacleId, ObstacleKind, ObstacleRegistry, Removal};
use super::parallax::Parallax;
use super::pause::{PauseStage, ScriptedPauseController};
use super::player::{Player, Pose};
use super::spawn::SpawnScheduler;
use super::timer::Scheduler;
use crate::tuning::Tuning;

/// Top-level phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    /// Waiting for the first input
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Milestone interlude; no spawning, scroll frozen
    ScriptedPause,
    /// Hit a hazard; frozen until restart
    GameOver,
}

/// Sound cues for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Jump,
    Collect,
    Hit,
    /// Looping background track
    Music,
}

/// Prompt the UI should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Hidden,
    Start,
    GameOver,
}

/// Fire-and-forget notifications for rendering, audio and UI
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RunStarted { run: u32 },
    Jumped,
    /// Dust puffs at the player's feet
    Dust { count: u32 },
    Spawned { id: ObstacleId, kind: ObstacleKind },
    Removed { id: ObstacleId, reason: Removal },
    /// Collect burst at the fish's last position
    Collected { id: ObstacleId, pos: Vec2 },
    ScoreChanged(u32),
    ScriptedPauseStarted { milestone: u32 },
    PoseChanged(Pose),
    ScriptedPauseEnded { milestone: u32 },
    GameOver { score: u32 },
    PlayCue(Cue),
    StopCue(Cue),
    Prompt(Prompt),
}

/// Everything one run owns
#[derive(Debug, Clone)]
pub struct RunState {
    /// Seed this run's RNG was created from
    pub seed: u64,
    /// 1 for the first run of a session, incremented per restart
    pub run_number: u32,
    pub phase: RunPhase,
    /// Fish collected this run
    pub score: u32,
    pub clock: DifficultyClock,
    /// Milestones already triggered this run
    pub consumed_milestones: BTreeSet<u32>,
    pub player: Player,
    pub obstacles: ObstacleRegistry,
    pub spawner: SpawnScheduler,
    pub pause: ScriptedPauseController,
    /// Every pending timer of this run
    pub timers: Scheduler,
    /// Global physics freeze (idle, pose held, game over)
    pub physics_paused: bool,
    pub parallax: Parallax,
    pub tuning: Tuning,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl RunState {
    /// Fresh idle run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Fresh idle run
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self::build(seed, tuning, 1)
    }

    fn build(seed: u64, tuning: Tuning, run_number: u32) -> Self {
        let mut state = Self {
            seed,
            run_number,
            phase: RunPhase::Idle,
            score: 0,
            clock: DifficultyClock::new(tuning.baseline_speed, tuning.speed_increase_per_second),
            consumed_milestones: BTreeSet::new(),
            player: Player::default(),
            obstacles: ObstacleRegistry::new(&tuning),
            spawner: SpawnScheduler::new(tuning.spawn_interval_ms),
            pause: ScriptedPauseController::default(),
            timers: Scheduler::new(),
            physics_paused: true,
            parallax: Parallax::default(),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };
        state.emit(GameEvent::ScoreChanged(0));
        state.emit(GameEvent::Prompt(Prompt::Start));
        state
    }

    /// Current scroll speed (px/s, negative = leftward)
    pub fn scroll_speed(&self) -> f32 {
        self.clock.speed()
    }

    /// Milliseconds spent in the running phase this run
    pub fn elapsed_run_time_ms(&self) -> f64 {
        self.clock.elapsed_ms()
    }

    /// Grounded flag as reported by the physics step
    pub fn is_grounded(&self) -> bool {
        self.player.on_ground
    }

    /// Whether obstacles move and can be touched: while running, and during a
    /// scripted pause until the runner has landed and struck the pose
    pub fn obstacles_live(&self) -> bool {
        match self.phase {
            RunPhase::Running => true,
            RunPhase::ScriptedPause => {
                matches!(self.pause.stage(), PauseStage::AwaitingLanding { .. })
            }
            RunPhase::Idle | RunPhase::GameOver => false,
        }
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events published since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hand the pending events to the collaborators
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Cancel every timer this run scheduled. Returns how many were pending.
    pub fn teardown(&mut self) -> usize {
        let mut cancelled = 0;
        if self.pause.cancel(&mut self.timers) {
            cancelled += 1;
        }
        if self.spawner.cancel(&mut self.timers) {
            cancelled += 1;
        }
        cancelled += self.timers.cancel_all();
        log::debug!("Run {} torn down, {} timers cancelled", self.run_number, cancelled);
        cancelled
    }

    /// Replace this run with a fresh idle one. Pending events are kept so the
    /// collaborators still see the end of the old run.
    pub fn reset_for_new_run(&mut self) {
        self.teardown();
        let seed = self.rng.random::<u64>();
        let events = std::mem::take(&mut self.events);
        let tuning = self.tuning.clone();
        *self = Self::build(seed, tuning, self.run_number + 1);
        let fresh = std::mem::replace(&mut self.events, events);
        self.events.extend(fresh);
    }
}
