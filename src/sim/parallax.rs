//! Parallax scroll offsets
//!
//! Purely visual. Background layers drift at fixed rates; the sidewalk moves
//! with the scroll speed so the runner appears to stand on it.

use crate::consts::FIELD_WIDTH;

/// Layer drift in pixels per 60 Hz frame, back to front
pub const LAYER_RATES: [f32; 3] = [0.5, 1.5, 6.0];

/// Offsets wrap here to keep float precision over long runs
const WRAP: f32 = FIELD_WIDTH;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parallax {
    /// Skyline layers (far, mid, near)
    pub layers: [f32; 3],
    /// Sidewalk tile offset
    pub ground: f32,
}

impl Parallax {
    /// Advance offsets (dt in seconds) given the current scroll speed
    pub fn advance(&mut self, dt: f32, scroll_speed: f32) {
        for (offset, rate) in self.layers.iter_mut().zip(LAYER_RATES) {
            *offset = (*offset + rate * 60.0 * dt).rem_euclid(WRAP);
        }
        self.ground = (self.ground - scroll_speed * dt).rem_euclid(WRAP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_move_at_their_rates() {
        let mut p = Parallax::default();
        p.advance(1.0, -600.0);
        assert!((p.layers[0] - 30.0).abs() < 1e-3);
        assert!((p.layers[1] - 90.0).abs() < 1e-3);
        assert!((p.layers[2] - 360.0).abs() < 1e-3);
        assert!((p.ground - 600.0).abs() < 1e-3);
    }

    #[test]
    fn test_offsets_wrap() {
        let mut p = Parallax::default();
        for _ in 0..100 {
            p.advance(1.0, -600.0);
        }
        assert!(p.ground >= 0.0 && p.ground < WRAP);
        assert!(p.layers.iter().all(|o| *o >= 0.0 && *o < WRAP));
    }
}
