//! Heartshot - An isometric arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, AI, effects)
//! - `game`: Session facade that owns the simulation and talks to persistence
//! - `persistence`: Save data with pluggable storage backends
//! - `platform`: Browser bindings
//! - `settings`: Player preferences

pub mod game;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{QualityPreset, Settings};

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Hard ceiling on a single frame delta (seconds); guards against stalls
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// World is a square of this half-extent centered on the origin
    pub const WORLD_HALF_EXTENT: f32 = 44.0;
    /// Hens are kept a little further from the edge
    pub const HEN_HALF_EXTENT: f32 = 40.0;
    /// Extra push applied when separating overlapping circles
    pub const PUSH_EPSILON: f32 = 0.1;

    /// Slow motion defaults
    pub const SLOW_MO_SCALE: f32 = 0.2;
    pub const SLOW_MO_DURATION: f32 = 2.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 0.4;
    pub const PLAYER_MIN_SPEED: f32 = 3.0;
    pub const PLAYER_MAX_SPEED: f32 = 16.0;
    pub const PLAYER_ACCELERATION: f32 = 30.0;
    pub const PLAYER_DECELERATION: f32 = 40.0;
    /// Move-to-point stops within this distance
    pub const PLAYER_ARRIVE_RADIUS: f32 = 0.5;
    /// Seconds between shots
    pub const FIRE_COOLDOWN: f32 = 0.2;
    /// Projectiles leave the player at this height
    pub const MUZZLE_HEIGHT: f32 = 1.2;
    pub const MUZZLE_FORWARD: f32 = 0.5;
    /// Multi-shot spread (radians, ~15 degrees)
    pub const SPREAD_ANGLE: f32 = 0.26;

    /// Heart (player projectile) defaults
    pub const HEART_SPEED: f32 = 25.0;
    pub const HEART_LIFETIME: f32 = 3.0;
    /// Homing turn rate (direction lerp factor per second)
    pub const HEART_TURN_RATE: f32 = 3.0;
    /// Planar hit radius against animals
    pub const HEART_HIT_RADIUS: f32 = 1.5;
    /// Planar hit radius against hens
    pub const HEN_HIT_RADIUS: f32 = 0.5;

    /// Egg (hazard projectile) defaults
    pub const EGG_SPEED: f32 = 12.0;
    pub const EGG_LIFETIME: f32 = 5.0;
    pub const EGG_HIT_RADIUS: f32 = 1.5;
    pub const EGG_LAUNCH_HEIGHT: f32 = 0.6;

    /// Animal defaults
    pub const ANIMAL_RADIUS: f32 = 0.8;
    /// Wander targets are picked within +/- half of this range
    pub const ANIMAL_WANDER_RANGE: f32 = 10.0;
    pub const ANIMAL_GRAZE_SPEED_FACTOR: f32 = 0.3;
    /// How far behind an obstacle an animal tries to hide
    pub const COVER_OFFSET: f32 = 3.0;
    /// Arrival radius for wander targets and hiding spots
    pub const ARRIVE_RADIUS: f32 = 1.0;
    /// Look-ahead when fleeing with nowhere to hide
    pub const FLEE_LOOKAHEAD: f32 = 10.0;
    pub const ANIMAL_TURN_RATE: f32 = 8.0;
    /// White flash after a unicorn is reverted
    pub const REVERT_FLASH_DURATION: f32 = 0.2;

    /// Hen defaults
    pub const HEN_RADIUS: f32 = 0.5;
    pub const HEN_SPEED: f32 = 3.0;
    pub const HEN_WANDER_RANGE: f32 = 15.0;
    pub const HEN_WANDER_INTERVAL: f32 = 3.0;
    pub const HEN_TURN_RATE: f32 = 5.0;
    pub const HEN_FIRST_COOLDOWN: f32 = 3.0;
    pub const HEN_COOLDOWN_MIN: f32 = 2.5;
    pub const HEN_COOLDOWN_SPREAD: f32 = 2.0;
    /// Hens and power-ups spawn within +/- this of the origin
    pub const SPAWN_HALF_EXTENT: f32 = 30.0;
}

/// Fixed yaw of the isometric camera (radians)
pub const CAMERA_YAW: f32 = -std::f32::consts::FRAC_PI_4;

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate between two angles along the shortest arc
pub fn lerp_angle(a: f32, b: f32, t: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut diff = b - a;
    while diff < -PI {
        diff += TAU;
    }
    while diff > PI {
        diff -= TAU;
    }
    a + diff * t
}

/// Forward vector for a heading (0 faces +z, rotation about +y)
#[inline]
pub fn heading_to_forward(rotation: f32) -> Vec3 {
    Vec3::new(rotation.sin(), 0.0, rotation.cos())
}

/// Heading that faces along `dir` (planar part only)
#[inline]
pub fn forward_to_heading(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}

/// Project onto the ground plane as (x, z)
#[inline]
pub fn planar(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Distance between two points ignoring height
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar(a).distance(planar(b))
}

/// Rotate a screen-space direction into the world ground plane
///
/// Screen intent is relative to the isometric camera, so it is rotated by
/// the camera yaw. Zero input maps to a zero vector.
pub fn screen_to_world(screen_dir: Vec2) -> Vec3 {
    if screen_dir.length_squared() == 0.0 {
        return Vec3::ZERO;
    }
    let n = screen_dir.normalize();
    let (s, c) = CAMERA_YAW.sin_cos();
    let world_x = n.x * c - n.y * s;
    let world_z = n.x * s + n.y * c;
    Vec3::new(world_x, 0.0, world_z).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_lerp_angle_takes_short_way() {
        let a = PI - 0.1;
        let b = -PI + 0.1;
        let mid = lerp_angle(a, b, 0.5);
        // Halfway across the seam is +/- PI, not zero
        assert!((mid.abs() - PI).abs() < 1e-4);
    }

    #[test]
    fn test_heading_round_trip() {
        let dir = Vec3::new(1.0, 0.0, 1.0).normalize();
        let heading = forward_to_heading(dir);
        let back = heading_to_forward(heading);
        assert!((back - dir).length() < 1e-5);
    }

    #[test]
    fn test_screen_to_world_zero_and_unit() {
        assert_eq!(screen_to_world(Vec2::ZERO), Vec3::ZERO);
        let w = screen_to_world(Vec2::new(0.0, 3.0));
        assert!((w.length() - 1.0).abs() < 1e-5);
        assert_eq!(w.y, 0.0);
    }
}
