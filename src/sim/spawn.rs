//! Obstacle spawn cadence
//!
//! The scheduler owns one repeating timer. It is paused, never reset, when
//! the run leaves the running phase, so a resumed run keeps the remaining
//! part of the interval and no missed firing is replayed.

use rand::Rng;

use super::obstacle::ObstacleKind;
use super::timer::{Scheduler, TimerId, TimerKind};

/// Weighted coin flip for the next obstacle: above the threshold is a hazard
pub fn roll_kind<R: Rng + ?Sized>(rng: &mut R, hazard_threshold: f32) -> ObstacleKind {
    if rng.random::<f32>() > hazard_threshold {
        ObstacleKind::Hazard
    } else {
        ObstacleKind::Collectible
    }
}

/// Drives the spawn timer of a run
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    interval_ms: f32,
    timer: Option<TimerId>,
    /// Spawn requests produced this run
    pub fired: u64,
}

impl SpawnScheduler {
    pub fn new(interval_ms: f32) -> Self {
        Self {
            interval_ms,
            timer: None,
            fired: 0,
        }
    }

    /// Begin the cadence. A second call while started is ignored.
    pub fn start(&mut self, timers: &mut Scheduler) {
        if self.timer.is_some_and(|id| timers.is_live(id)) {
            return;
        }
        self.timer = Some(timers.every(TimerKind::Spawn, self.interval_ms));
    }

    /// Freeze the cadence, keeping the elapsed part of the interval
    pub fn suspend(&mut self, timers: &mut Scheduler) {
        if let Some(id) = self.timer {
            timers.pause(id);
        }
    }

    /// Continue from where [`SpawnScheduler::suspend`] stopped
    pub fn resume(&mut self, timers: &mut Scheduler) {
        if let Some(id) = self.timer {
            timers.resume(id);
        }
    }

    /// Drop the timer for good. Returns whether one was live.
    pub fn cancel(&mut self, timers: &mut Scheduler) -> bool {
        self.timer.take().is_some_and(|id| timers.cancel(id))
    }

    /// Whether a fired timer belongs to this scheduler
    pub fn owns(&self, id: TimerId) -> bool {
        self.timer == Some(id)
    }

    pub fn is_running(&self, timers: &Scheduler) -> bool {
        self.timer
            .is_some_and(|id| timers.is_live(id) && !timers.is_paused(id))
    }

    /// Produce the request for one firing
    pub fn request<R: Rng + ?Sized>(&mut self, rng: &mut R, hazard_threshold: f32) -> ObstacleKind {
        self.fired += 1;
        roll_kind(rng, hazard_threshold)
    }
}
