//! Lunar Lander - A vector-drawn arcade lander
//!
//! Core modules:
//! - `sim`: Deterministic simulation (sprites, ship, stage, game state)
//! - `renderer`: WebGPU line rendering pipeline
//! - `platform`: Drawing surface, input mapping and frame timing
//! - `audio`: Name-keyed sound registry
//! - `ui`: Per-frame composition of sprites and HUD text
//! - `settings`: Persisted player preferences

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use audio::{SoundError, SoundManager};
pub use settings::Settings;

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Target frame rate; one simulation step per frame
    pub const TARGET_FPS: u32 = 60;
    /// Fixed frame duration in seconds
    pub const FRAME_DT: f64 = 1.0 / TARGET_FPS as f64;
    /// Maximum steps per animation frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Stage dimensions
    pub const STAGE_TITLE: &str = "Atari Lunar Lander";
    pub const STAGE_WIDTH: u32 = 1024;
    pub const STAGE_HEIGHT: u32 = 768;

    /// Ship kinematics (units per frame)
    pub const SHIP_ACCELERATION: f64 = 0.02;
    pub const SHIP_DECELERATION: f64 = -0.005;
    pub const SHIP_MAX_VELOCITY: f64 = 5.0;
    /// Degrees per rotate call
    pub const SHIP_TURN_ANGLE: f64 = 5.0;

    /// Frames the explosion plays before the ship respawns
    pub const EXPLODING_TTL: u32 = 180;

    /// Debris outward speed divisor range
    pub const DEBRIS_SPREAD_MIN: f64 = 20.0;
    pub const DEBRIS_SPREAD_MAX: f64 = 40.0;

    /// FPS readout is recomputed every N frames
    pub const FPS_SAMPLE_FRAMES: u32 = 10;
}

/// Rotate a local-space point by `degrees` about the origin.
///
/// Screen space is y-down, so with this convention the local nose `(0, -1)`
/// rotated by `a` points along `(-sin a, -cos a)`, the same direction thrust
/// is applied in.
#[inline]
pub fn rotate_degrees(point: DVec2, degrees: f64) -> DVec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    DVec2::new(point.x * cos + point.y * sin, -point.x * sin + point.y * cos)
}

/// Unit direction the nose points at for the given heading angle (degrees)
#[inline]
pub fn nose_direction(degrees: f64) -> DVec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    DVec2::new(-sin, -cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_zero_is_identity() {
        let p = DVec2::new(6.0, -15.0);
        assert_eq!(rotate_degrees(p, 0.0), p);
    }

    #[test]
    fn test_rotated_nose_matches_nose_direction() {
        for angle in [0.0, 5.0, 45.0, 90.0, 180.0, -135.0] {
            let nose = rotate_degrees(DVec2::new(0.0, -1.0), angle);
            assert!((nose - nose_direction(angle)).length() < 1e-12);
        }
    }

    #[test]
    fn test_rotate_quarter_turn() {
        // Nose up rotated 90 degrees points to screen left
        let p = rotate_degrees(DVec2::new(0.0, -10.0), 90.0);
        assert!((p - DVec2::new(-10.0, 0.0)).length() < 1e-9);
    }
}
