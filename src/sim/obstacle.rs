//! Obstacle registry
//!
//! Owns every live hazard and collectible. Removal goes through
//! [`ObstacleRegistry::destroy`] only, which is idempotent: an obstacle is
//! marked inactive exactly once and swept out at the end of the tick.

use glam::Vec2;
use rand::Rng;

use crate::boxes_overlap;
use crate::consts::*;
use crate::tuning::Tuning;

/// Stable identifier of an obstacle within a run
pub type ObstacleId = u32;

/// What touching the obstacle does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Ends the run (trash can)
    Hazard,
    /// Scores a point and is consumed (fish)
    Collectible,
}

impl ObstacleKind {
    pub fn half_extents(self) -> Vec2 {
        match self {
            ObstacleKind::Hazard => Vec2::new(HAZARD_HALF_W, HAZARD_HALF_H),
            ObstacleKind::Collectible => Vec2::new(COLLECTIBLE_HALF_W, COLLECTIBLE_HALF_H),
        }
    }
}

/// Why an obstacle left the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Scrolled past the left edge
    Culled,
    /// Picked up by the player
    Consumed,
}

/// A hazard or collectible scrolling toward the player
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    /// Center of the collision box
    pub pos: Vec2,
    pub half_extents: Vec2,
    /// Horizontal speed (px/s, negative = leftward)
    pub velocity_x: f32,
    /// False once destroyed; inactive obstacles are never processed again
    pub active: bool,
}

/// Spawn layout taken from the tuning
#[derive(Debug, Clone, PartialEq)]
struct Layout {
    spawn_x: f32,
    cull_x: f32,
    collectible_speed_factor: f32,
    collectible_band: [f32; 2],
}

/// Y of a hazard's center: resting on the ground, slightly sunk in
pub fn hazard_y() -> f32 {
    GROUND_TOP - HAZARD_HALF_H + HAZARD_SINK
}

/// Uniform pick of a collectible's height within the band
pub fn roll_collectible_y<R: Rng + ?Sized>(rng: &mut R, band: [f32; 2]) -> f32 {
    let [lo, hi] = band;
    if lo >= hi {
        return lo;
    }
    rng.random_range(lo..=hi)
}

/// The set of live obstacles
#[derive(Debug, Clone)]
pub struct ObstacleRegistry {
    obstacles: Vec<Obstacle>,
    next_id: ObstacleId,
    layout: Layout,
}

impl ObstacleRegistry {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            obstacles: Vec::new(),
            next_id: 1,
            layout: Layout {
                spawn_x: tuning.spawn_x,
                cull_x: tuning.cull_x,
                collectible_speed_factor: tuning.collectible_speed_factor,
                collectible_band: tuning.collectible_band,
            },
        }
    }

    /// Create an obstacle at the right edge moving with the given scroll speed
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        kind: ObstacleKind,
        scroll_speed: f32,
        rng: &mut R,
    ) -> ObstacleId {
        let id = self.next_id;
        self.next_id += 1;

        let (y, velocity_x) = match kind {
            ObstacleKind::Hazard => (hazard_y(), scroll_speed),
            ObstacleKind::Collectible => (
                roll_collectible_y(rng, self.layout.collectible_band),
                scroll_speed * self.layout.collectible_speed_factor,
            ),
        };

        self.obstacles.push(Obstacle {
            id,
            kind,
            pos: Vec2::new(self.layout.spawn_x, y),
            half_extents: kind.half_extents(),
            velocity_x,
            active: true,
        });
        id
    }

    /// Move active obstacles and cull the ones past the left edge.
    /// Returns the culled ids; culling has no gameplay effect.
    pub fn tick(&mut self, dt: f32) -> Vec<ObstacleId> {
        let cull_x = self.layout.cull_x;
        let mut culled = Vec::new();
        for obstacle in self.obstacles.iter_mut().filter(|o| o.active) {
            obstacle.pos.x += obstacle.velocity_x * dt;
            if obstacle.pos.x < cull_x {
                obstacle.active = false;
                culled.push(obstacle.id);
            }
        }
        culled
    }

    /// Mark an obstacle destroyed. Returns false if it was already inactive or gone.
    pub fn destroy(&mut self, id: ObstacleId) -> bool {
        match self.obstacles.iter_mut().find(|o| o.id == id) {
            Some(obstacle) if obstacle.active => {
                obstacle.active = false;
                true
            }
            _ => false,
        }
    }

    /// Drop destroyed obstacles from storage
    pub fn sweep(&mut self) {
        self.obstacles.retain(|o| o.active);
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Active obstacles, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| o.active)
    }

    pub fn active_count(&self) -> usize {
        self.iter().count()
    }

    /// Ids of active obstacles whose box intersects the given box
    pub fn overlapping(&self, center: Vec2, half: Vec2) -> Vec<ObstacleId> {
        self.iter()
            .filter(|o| boxes_overlap(center, half, o.pos, o.half_extents))
            .map(|o| o.id)
            .collect()
    }
}
