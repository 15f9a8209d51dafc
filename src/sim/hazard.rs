//! Egg-throwing hens
//!
//! Hens wander and throw on two independent timers. There is no shared
//! state machine: wandering never pauses for a throw.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::terrain;
use crate::consts::*;
use crate::{forward_to_heading, heading_to_forward, lerp_angle, planar};

/// An egg leaving a hen this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EggThrow {
    pub origin: Vec3,
    /// Unit direction toward the player's position at throw time
    pub direction: Vec3,
}

/// A hazard hen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hen {
    pub id: u32,
    pub position: Vec3,
    pub rotation: f32,
    pub radius: f32,
    /// Roasted hens are scenery: no wandering, no throwing, not hittable
    pub roasted: bool,
    wander_target: Vec3,
    wander_timer: f32,
    throw_timer: f32,
    throw_cooldown: f32,
}

impl Hen {
    pub fn new(id: u32, x: f32, z: f32, rng: &mut Pcg32) -> Self {
        let position = terrain::ground_point(x, z);
        let mut hen = Self {
            id,
            position,
            rotation: 0.0,
            radius: HEN_RADIUS,
            roasted: false,
            wander_target: position,
            wander_timer: 0.0,
            // Stagger the first throw so hens don't volley in unison
            throw_timer: rng.random::<f32>() * HEN_FIRST_COOLDOWN,
            throw_cooldown: HEN_FIRST_COOLDOWN,
        };
        hen.pick_wander_target(rng);
        hen
    }

    /// Spawn at a random spot inside the spawn square
    pub fn spawn_random(id: u32, rng: &mut Pcg32) -> Self {
        let x = rng.random_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT);
        let z = rng.random_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT);
        Self::new(id, x, z, rng)
    }

    pub fn is_alive(&self) -> bool {
        !self.roasted
    }

    pub fn wander_target(&self) -> Vec3 {
        self.wander_target
    }

    /// Wander, maybe throw. Returns the egg thrown this frame, if any.
    pub fn update(&mut self, dt: f32, player_pos: Vec3, rng: &mut Pcg32) -> Option<EggThrow> {
        if self.roasted {
            return None;
        }

        self.wander_timer += dt;
        if self.wander_timer > HEN_WANDER_INTERVAL {
            self.pick_wander_target(rng);
            self.wander_timer = 0.0;
        }

        let to_target = planar(self.wander_target) - planar(self.position);
        let distance = to_target.length();
        if distance > ARRIVE_RADIUS {
            let dir = to_target / distance;
            let velocity = Vec3::new(dir.x, 0.0, dir.y) * HEN_SPEED;
            self.position += velocity * dt;
            let target = forward_to_heading(velocity);
            self.rotation = lerp_angle(self.rotation, target, (dt * HEN_TURN_RATE).min(1.0));
        }

        let mut egg = None;
        self.throw_timer += dt;
        if self.throw_timer >= self.throw_cooldown {
            self.throw_timer = 0.0;
            self.throw_cooldown = HEN_COOLDOWN_MIN + rng.random::<f32>() * HEN_COOLDOWN_SPREAD;

            let to_player = player_pos - self.position;
            if planar(to_player).length_squared() > f32::EPSILON {
                self.rotation = forward_to_heading(to_player);
            }

            let origin = self.position + Vec3::Y * EGG_LAUNCH_HEIGHT;
            let direction = match (player_pos - origin).try_normalize() {
                Some(dir) => dir,
                None => heading_to_forward(self.rotation),
            };
            egg = Some(EggThrow { origin, direction });
        }

        terrain::clamp_to_bounds(&mut self.position, HEN_HALF_EXTENT);
        terrain::snap_to_ground(&mut self.position);
        egg
    }

    /// Cook the hen; false if it was already roasted
    pub fn roast(&mut self) -> bool {
        if self.roasted {
            return false;
        }
        self.roasted = true;
        true
    }

    fn pick_wander_target(&mut self, rng: &mut Pcg32) {
        let x = self.position.x + (rng.random::<f32>() - 0.5) * HEN_WANDER_RANGE;
        let z = self.position.z + (rng.random::<f32>() - 0.5) * HEN_WANDER_RANGE;
        self.wander_target = Vec3::new(x, 0.0, z);
    }
}
