//! The player character
//!
//! Two movement modes: a screen-space direction (keys, stick) or a
//! move-to-point target (pointer). A target, when set, wins.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::terrain;
use crate::consts::*;
use crate::{planar, screen_to_world};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec3,
    /// Unit planar facing
    pub facing: Vec3,
    pub speed: f32,
    pub radius: f32,
    pub move_target: Option<Vec3>,
    /// Seconds until the next shot is allowed
    pub fire_cooldown: f32,
}

impl Player {
    pub fn new(start: Vec3) -> Self {
        Self {
            position: terrain::ground_point(start.x, start.z),
            facing: Vec3::Z,
            speed: 0.0,
            radius: PLAYER_RADIUS,
            move_target: None,
            fire_cooldown: 0.0,
        }
    }

    pub fn set_move_target(&mut self, target: Vec3) {
        self.move_target = Some(target);
    }

    pub fn clear_move_target(&mut self) {
        self.move_target = None;
    }

    /// Integrate one frame of movement
    ///
    /// `speed_multiplier` scales the top speed (speed power-up). Bounds
    /// and ground snapping are left to the collision pass.
    pub fn update_movement(&mut self, dt: f32, move_dir: Vec2, speed_multiplier: f32) {
        let dir = match self.move_target {
            Some(target) => {
                let to_target = planar(target) - planar(self.position);
                let distance = to_target.length();
                if distance < PLAYER_ARRIVE_RADIUS {
                    self.move_target = None;
                    None
                } else {
                    let d = to_target / distance;
                    Some(Vec3::new(d.x, 0.0, d.y))
                }
            }
            None => {
                let world = screen_to_world(move_dir);
                (world != Vec3::ZERO).then_some(world)
            }
        };

        let Some(dir) = dir else {
            self.speed = (self.speed - PLAYER_DECELERATION * dt).max(0.0);
            return;
        };

        self.speed = self.speed.max(PLAYER_MIN_SPEED);
        self.speed = (self.speed + PLAYER_ACCELERATION * dt).min(PLAYER_MAX_SPEED);

        let step = self.speed * speed_multiplier * dt;
        self.position.x += dir.x * step;
        self.position.z += dir.z * step;
        self.facing = dir;
    }

    pub fn can_fire(&self) -> bool {
        self.fire_cooldown <= 0.0
    }

    pub fn tick_cooldown(&mut self, dt: f32) {
        if self.fire_cooldown > 0.0 {
            self.fire_cooldown -= dt;
        }
    }

    pub fn start_cooldown(&mut self) {
        self.fire_cooldown = FIRE_COOLDOWN;
    }

    /// Where shots leave the gun
    pub fn muzzle(&self) -> Vec3 {
        self.position + Vec3::Y * MUZZLE_HEIGHT + self.facing * MUZZLE_FORWARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accelerates_from_min_speed() {
        let mut player = Player::new(Vec3::ZERO);
        player.update_movement(0.1, Vec2::new(0.0, 1.0), 1.0);
        assert!((player.speed - (PLAYER_MIN_SPEED + 3.0)).abs() < 1e-5);
        for _ in 0..20 {
            player.update_movement(0.1, Vec2::new(0.0, 1.0), 1.0);
        }
        assert_eq!(player.speed, PLAYER_MAX_SPEED);
    }

    #[test]
    fn test_decelerates_without_input() {
        let mut player = Player::new(Vec3::ZERO);
        player.speed = 10.0;
        let before = player.position;
        player.update_movement(0.1, Vec2::ZERO, 1.0);
        assert!((player.speed - 6.0).abs() < 1e-5);
        assert_eq!(player.position, before);
        player.update_movement(1.0, Vec2::ZERO, 1.0);
        assert_eq!(player.speed, 0.0);
    }

    #[test]
    fn test_move_target_overrides_direction_and_clears_on_arrival() {
        let mut player = Player::new(Vec3::ZERO);
        player.set_move_target(Vec3::new(5.0, 0.0, 0.0));
        for _ in 0..120 {
            // Directional input pulls the other way and is ignored
            player.update_movement(1.0 / 60.0, Vec2::new(-1.0, 0.0), 1.0);
            if player.move_target.is_none() {
                break;
            }
        }
        assert!(player.move_target.is_none());
        assert!((player.position.x - 5.0).abs() < 0.6);
        assert!((player.facing - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_speed_multiplier_scales_step() {
        let mut slow = Player::new(Vec3::ZERO);
        let mut fast = Player::new(Vec3::ZERO);
        slow.update_movement(0.1, Vec2::new(1.0, 0.0), 1.0);
        fast.update_movement(0.1, Vec2::new(1.0, 0.0), 1.5);
        let ds = planar(slow.position).length();
        let df = planar(fast.position).length();
        assert!((df / ds - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_fire_cooldown() {
        let mut player = Player::new(Vec3::ZERO);
        assert!(player.can_fire());
        player.start_cooldown();
        assert!(!player.can_fire());
        player.tick_cooldown(0.1);
        assert!(!player.can_fire());
        player.tick_cooldown(0.11);
        assert!(player.can_fire());
    }

    #[test]
    fn test_muzzle_is_above_and_ahead() {
        let player = Player::new(Vec3::ZERO);
        let m = player.muzzle();
        assert!((m.y - player.position.y - MUZZLE_HEIGHT).abs() < 1e-5);
        assert!((m.z - MUZZLE_FORWARD).abs() < 1e-5);
    }
}
