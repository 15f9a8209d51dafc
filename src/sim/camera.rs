//! Isometric follow camera
//!
//! Only position and look-at are simulated; projection belongs to the
//! renderer.

use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

const CAMERA_ANGLE: f32 = PI / 4.0;
const CAMERA_PITCH: f32 = PI / 5.0;
const CAMERA_DISTANCE: f32 = 12.0;
const FOLLOW_SPEED: f32 = 5.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: Vec3,
    pub look_at: Vec3,
    /// Shake perturbation for this frame (render-only)
    pub shake_offset: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Self::offset(),
            look_at: Vec3::ZERO,
            shake_offset: Vec3::ZERO,
        }
    }
}

impl CameraRig {
    /// Camera offset from the followed point (height is absolute)
    fn offset() -> Vec3 {
        Vec3::new(
            CAMERA_ANGLE.sin() * CAMERA_DISTANCE,
            CAMERA_DISTANCE * CAMERA_PITCH.tan(),
            CAMERA_ANGLE.cos() * CAMERA_DISTANCE,
        )
    }

    fn desired(target: Vec3) -> Vec3 {
        let offset = Self::offset();
        Vec3::new(target.x + offset.x, offset.y, target.z + offset.z)
    }

    /// Jump straight to the follow position (level load)
    pub fn snap_to(&mut self, target: Vec3) {
        self.position = Self::desired(target);
        self.look_at = target + Vec3::Y;
        self.shake_offset = Vec3::ZERO;
    }

    /// Ease toward the follow position
    pub fn follow(&mut self, target: Vec3, dt: f32, shake_offset: Vec3) {
        let t = (dt * FOLLOW_SPEED).min(1.0);
        self.position = self.position.lerp(Self::desired(target), t);
        self.look_at = target + Vec3::Y;
        self.shake_offset = shake_offset;
    }

    /// Position the renderer should use
    pub fn render_position(&self) -> Vec3 {
        self.position + self.shake_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_converges() {
        let mut cam = CameraRig::default();
        let target = Vec3::new(10.0, 2.0, -5.0);
        for _ in 0..300 {
            cam.follow(target, 1.0 / 60.0, Vec3::ZERO);
        }
        assert!((cam.position - CameraRig::desired(target)).length() < 1e-3);
        assert_eq!(cam.look_at, Vec3::new(10.0, 3.0, -5.0));
    }

    #[test]
    fn test_shake_only_moves_render_position() {
        let mut cam = CameraRig::default();
        cam.snap_to(Vec3::ZERO);
        let before = cam.position;
        cam.follow(Vec3::ZERO, 0.016, Vec3::new(0.1, 0.0, 0.0));
        assert_eq!(cam.position, before);
        assert_eq!(cam.render_position(), before + Vec3::new(0.1, 0.0, 0.0));
    }
}
