//! Deterministic run engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timers are owned by the run and advanced by the tick, never by the host
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod obstacle;
pub mod parallax;
pub mod pause;
pub mod player;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use clock::DifficultyClock;
pub use collision::CollisionOutcome;
pub use obstacle::{Obstacle, ObstacleId, ObstacleKind, ObstacleRegistry, Removal};
pub use parallax::Parallax;
pub use pause::{PauseStage, ScriptedPauseController};
pub use player::{Player, Pose};
pub use spawn::SpawnScheduler;
pub use state::{Cue, GameEvent, Prompt, RunPhase, RunState};
pub use tick::{TickInput, on_overlap, primary_action, tick};
pub use timer::{Scheduler, TimerId, TimerKind};
