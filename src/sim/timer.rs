//! Cooperative timers
//!
//! Every delayed or repeating callback of a run is an entry in the run's
//! [`Scheduler`]. Nothing fires on its own: the tick advances the scheduler,
//! gets back the list of timers that came due, and dispatches them itself.
//! Dropping a run therefore can never leave a callback behind, and
//! [`Scheduler::cancel_all`] makes the teardown explicit.

/// Handle to a scheduled timer. Handles are never reused within a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u32);

/// What a timer is for, so the tick knows where to route it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Obstacle spawn cadence
    Spawn,
    /// Grounded sampling during a scripted pause
    GroundPoll,
    /// End of the scripted pose
    PoseHold,
}

/// A timer that came due during [`Scheduler::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub kind: TimerKind,
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    kind: TimerKind,
    delay_ms: f32,
    elapsed_ms: f32,
    repeat: bool,
    paused: bool,
    done: bool,
}

/// Smallest interval a repeating timer may use
const MIN_INTERVAL_MS: f32 = 1.0;

/// Owns every pending timer of a run
#[derive(Debug, Clone)]
pub struct Scheduler {
    timers: Vec<Timer>,
    next_id: u32,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 1,
        }
    }

    fn insert(&mut self, kind: TimerKind, delay_ms: f32, repeat: bool) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            kind,
            delay_ms,
            elapsed_ms: 0.0,
            repeat,
            paused: false,
            done: false,
        });
        id
    }

    /// Schedule a repeating timer
    pub fn every(&mut self, kind: TimerKind, interval_ms: f32) -> TimerId {
        self.insert(kind, interval_ms.max(MIN_INTERVAL_MS), true)
    }

    /// Schedule a one-shot timer
    pub fn after(&mut self, kind: TimerKind, delay_ms: f32) -> TimerId {
        self.insert(kind, delay_ms.max(0.0), false)
    }

    fn find_mut(&mut self, id: TimerId) -> Option<&mut Timer> {
        self.timers.iter_mut().find(|t| t.id == id && !t.done)
    }

    /// Cancel a timer. Returns false if it already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id || t.done);
        self.timers.len() != before
    }

    /// Stop a timer from advancing, keeping its elapsed time
    pub fn pause(&mut self, id: TimerId) -> bool {
        match self.find_mut(id) {
            Some(timer) => {
                timer.paused = true;
                true
            }
            None => false,
        }
    }

    /// Let a paused timer advance again from where it stopped
    pub fn resume(&mut self, id: TimerId) -> bool {
        match self.find_mut(id) {
            Some(timer) => {
                timer.paused = false;
                true
            }
            None => false,
        }
    }

    /// Whether a timer is still scheduled (paused timers count)
    pub fn is_live(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id && !t.done)
    }

    pub fn is_paused(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id && !t.done && t.paused)
    }

    /// Time left until the timer's next firing
    pub fn remaining_ms(&self, id: TimerId) -> Option<f32> {
        self.timers
            .iter()
            .find(|t| t.id == id && !t.done)
            .map(|t| (t.delay_ms - t.elapsed_ms).max(0.0))
    }

    /// Number of scheduled timers
    pub fn live_count(&self) -> usize {
        self.timers.iter().filter(|t| !t.done).count()
    }

    /// Advance every running timer and return the ones that came due, in
    /// scheduling order. A repeating timer that was crossed several times in a
    /// single advance fires once per crossing.
    pub fn advance(&mut self, dt_ms: f32) -> Vec<Fired> {
        let mut fired = Vec::new();
        if dt_ms < 0.0 {
            return fired;
        }

        for timer in self.timers.iter_mut().filter(|t| !t.paused && !t.done) {
            timer.elapsed_ms += dt_ms;
            while timer.elapsed_ms >= timer.delay_ms {
                fired.push(Fired {
                    id: timer.id,
                    kind: timer.kind,
                });
                if timer.repeat {
                    timer.elapsed_ms -= timer.delay_ms;
                } else {
                    timer.done = true;
                    break;
                }
            }
        }

        self.timers.retain(|t| !t.done);
        fired
    }

    /// Cancel everything. Returns how many timers were still pending.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.live_count();
        self.timers.clear();
        count
    }
}
