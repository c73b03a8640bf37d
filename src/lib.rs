//! Alley Runner - an endless-runner arcade game
//!
//! Core modules:
//! - `sim`: Deterministic run engine (timers, spawning, collisions, scripted pause)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `render` / `audio`: Browser adapters (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{QualityPreset, Settings};
pub use tuning::{PauseBrake, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation step (100 Hz, whole milliseconds keep timers exact)
    pub const SIM_DT_MS: f32 = 10.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 2000.0;
    pub const FIELD_HEIGHT: f32 = 1000.0;
    pub const GROUND_HEIGHT: f32 = 100.0;
    /// Y of the walkable ground surface
    pub const GROUND_TOP: f32 = FIELD_HEIGHT - GROUND_HEIGHT;

    /// Player spawn (body center)
    pub const PLAYER_START_X: f32 = 200.0;
    pub const PLAYER_START_Y: f32 = FIELD_HEIGHT - 250.0;
    /// Player collision box half size while running
    pub const PLAYER_HALF_W: f32 = 40.0;
    pub const PLAYER_HALF_H: f32 = 25.0;
    /// Player collision box half size while squatting
    pub const SQUAT_HALF_W: f32 = 34.0;
    pub const SQUAT_HALF_H: f32 = 20.0;
    /// Furthest right the forward hops can carry the player
    pub const PLAYER_MAX_X: f32 = FIELD_WIDTH / 2.0;

    /// Hazard (trash can) collision box half size
    pub const HAZARD_HALF_W: f32 = 30.0;
    pub const HAZARD_HALF_H: f32 = 45.0;
    /// Hazards sit slightly sunk into the sidewalk
    pub const HAZARD_SINK: f32 = 10.0;
    /// Collectible (fish) collision box half size
    pub const COLLECTIBLE_HALF_W: f32 = 25.0;
    pub const COLLECTIBLE_HALF_H: f32 = 12.0;

    /// Vertical landing speed below which the player settles instead of bouncing
    pub const REST_SPEED: f32 = 150.0;

    /// Dust puffs emitted on a jump
    pub const JUMP_DUST: u32 = 15;
}

/// Axis-aligned overlap test between two boxes given as center + half size
#[inline]
pub fn boxes_overlap(a_center: Vec2, a_half: Vec2, b_center: Vec2, b_half: Vec2) -> bool {
    let d = (a_center - b_center).abs();
    d.x < a_half.x + b_half.x && d.y < a_half.y + b_half.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxes_overlap() {
        let half = Vec2::splat(10.0);
        assert!(boxes_overlap(Vec2::ZERO, half, Vec2::new(15.0, 5.0), half));
        assert!(!boxes_overlap(Vec2::ZERO, half, Vec2::new(20.0, 0.0), half));
        assert!(!boxes_overlap(Vec2::ZERO, half, Vec2::new(0.0, -25.0), half));
    }
}
