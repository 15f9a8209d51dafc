//! Terrain height field
//!
//! Ground elevation is a pure function of (x, z). Every entity resnaps its
//! `y` to this after moving, so independent callers always agree.

use glam::Vec3;

/// Ground height at (x, z)
#[inline]
pub fn height_at(x: f32, z: f32) -> f32 {
    (x * 0.05).sin() * (z * 0.05).cos() * 3.0
        + (x * 0.1 + 1.0).sin() * (z * 0.08).cos() * 1.5
        + (x * 0.02).sin() * (z * 0.03).cos() * 5.0
}

/// Snap a position onto the ground
#[inline]
pub fn snap_to_ground(pos: &mut Vec3) {
    pos.y = height_at(pos.x, pos.z);
}

/// Point on the ground at (x, z)
#[inline]
pub fn ground_point(x: f32, z: f32) -> Vec3 {
    Vec3::new(x, height_at(x, z), z)
}

/// Clamp (x, z) into the square `[-half, half]`
#[inline]
pub fn clamp_to_bounds(pos: &mut Vec3, half: f32) {
    pos.x = pos.x.clamp(-half, half);
    pos.z = pos.z.clamp(-half, half);
}

/// True if (x, z) lies inside the square `[-half, half]`
#[inline]
pub fn in_bounds(x: f32, z: f32, half: f32) -> bool {
    x.is_finite() && z.is_finite() && x.abs() <= half && z.abs() <= half
}
