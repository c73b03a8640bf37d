//! Difficulty clock
//!
//! Scroll speed is a linear function of time spent running. The speed is
//! derived from the accumulated run time rather than decremented in place so
//! long runs don't drift.

/// Tracks running time and the scroll speed derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyClock {
    baseline: f32,
    increase_per_second: f32,
    elapsed_ms: f64,
}

impl DifficultyClock {
    pub fn new(baseline: f32, increase_per_second: f32) -> Self {
        Self {
            baseline,
            increase_per_second,
            elapsed_ms: 0.0,
        }
    }

    /// Add running time. Only call while the run is in the running phase.
    pub fn advance(&mut self, dt_ms: f32) {
        if dt_ms > 0.0 {
            self.elapsed_ms += dt_ms as f64;
        }
    }

    /// Back to the baseline speed
    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
    }

    /// Milliseconds spent running this run
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Current scroll speed (negative = leftward, magnitude grows without cap)
    pub fn speed(&self) -> f32 {
        speed_at(self.baseline, self.increase_per_second, self.elapsed_ms)
    }

    pub fn baseline(&self) -> f32 {
        self.baseline
    }
}

/// `baseline - increase * t / 1000`
#[inline]
pub fn speed_at(baseline: f32, increase_per_second: f32, elapsed_ms: f64) -> f32 {
    (baseline as f64 - increase_per_second as f64 * elapsed_ms / 1000.0) as f32
}
