//! The runner and its arcade physics
//!
//! A single body under gravity against a flat ground, with world bounds on
//! the horizontal axis. Horizontal velocity is only ever the forward hop
//! given by a jump; it is cleared on landing.

use glam::Vec2;

use crate::consts::*;
use crate::tuning::Tuning;

/// Visual pose, which also selects the collision footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pose {
    #[default]
    Running,
    /// Held during the scripted pause
    Squatting,
}

impl Pose {
    pub fn half_extents(self) -> Vec2 {
        match self {
            Pose::Running => Vec2::new(PLAYER_HALF_W, PLAYER_HALF_H),
            Pose::Squatting => Vec2::new(SQUAT_HALF_W, SQUAT_HALF_H),
        }
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Center of the collision box
    pub pos: Vec2,
    /// x = forward hop, y = vertical (positive = down)
    pub vel: Vec2,
    /// Touching the ground after the last physics step
    pub on_ground: bool,
    pub pose: Pose,
    pub gravity_enabled: bool,
    /// Tinted after hitting a hazard
    pub hit: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            vel: Vec2::ZERO,
            on_ground: false,
            pose: Pose::Running,
            gravity_enabled: true,
            hit: false,
        }
    }
}

impl Player {
    pub fn half_extents(&self) -> Vec2 {
        self.pose.half_extents()
    }

    /// Forward hop still carrying the player (kept across landings)
    pub fn horizontal_nudge_velocity(&self) -> f32 {
        self.vel.x
    }

    /// Upward launch plus forward hop
    pub fn apply_jump(&mut self, tuning: &Tuning) {
        self.vel = Vec2::new(tuning.jump_nudge, -tuning.jump_velocity);
        self.on_ground = false;
    }

    /// Integrate one step (dt in seconds)
    pub fn step(&mut self, dt: f32, tuning: &Tuning) {
        if self.gravity_enabled {
            self.vel.y += tuning.gravity * dt;
        }
        self.pos += self.vel * dt;

        let half = self.half_extents();

        // World bounds
        let min_x = half.x;
        let max_x = PLAYER_MAX_X.max(min_x);
        if self.pos.x < min_x || self.pos.x > max_x {
            self.pos.x = self.pos.x.clamp(min_x, max_x);
            self.vel.x = 0.0;
        }

        // Ground
        let floor = GROUND_TOP - half.y;
        if self.pos.y >= floor && self.vel.y >= 0.0 {
            self.pos.y = floor;
            let rebound = self.vel.y * tuning.bounce;
            self.vel.y = if rebound > REST_SPEED { -rebound } else { 0.0 };
            self.on_ground = true;
        } else {
            self.on_ground = false;
        }
    }
}
