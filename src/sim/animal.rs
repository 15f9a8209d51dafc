//! Horse behavior state machine
//!
//! grazing -> alert -> fleeing -> hiding -> grazing
//!
//! Transformed horses (unicorns) do not run the state machine at all until
//! an egg reverts them.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::obstacle::Obstacle;
use super::terrain;
use crate::consts::*;
use crate::{forward_to_heading, heading_to_forward, lerp_angle, planar, planar_distance};

/// Horse breeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimalKind {
    Normal,
    Fast,
    Shy,
    Brave,
    Baby,
}

/// Per-kind tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimalStats {
    pub speed: f32,
    /// Full cone angle in degrees
    pub vision_angle: f32,
    pub vision_distance: f32,
    /// Seconds spent staring before bolting
    pub alert_duration: f32,
    pub hits_required: u32,
    /// Presentation scale
    pub scale: f32,
}

impl AnimalKind {
    pub fn stats(&self) -> AnimalStats {
        let (speed, vision_angle, vision_distance, alert_duration, hits_required, scale) =
            match self {
                AnimalKind::Normal => (12.0, 90.0, 30.0, 0.4, 1, 1.0),
                AnimalKind::Fast => (18.0, 90.0, 30.0, 0.2, 1, 1.0),
                AnimalKind::Shy => (12.0, 120.0, 40.0, 0.6, 1, 1.0),
                AnimalKind::Brave => (10.0, 60.0, 20.0, 0.15, 2, 1.1),
                AnimalKind::Baby => (8.0, 70.0, 25.0, 0.8, 1, 0.7),
            };
        AnimalStats {
            speed,
            vision_angle,
            vision_distance,
            alert_duration,
            hits_required,
            scale,
        }
    }
}

/// Behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BehaviorState {
    Grazing,
    Alert,
    Fleeing,
    Hiding,
}

/// A horse
#[derive(Debug, Clone)]
pub struct Animal {
    pub id: u32,
    pub kind: AnimalKind,
    pub position: Vec3,
    /// Heading in radians (0 faces +z)
    pub rotation: f32,
    pub velocity: Vec3,
    pub radius: f32,
    pub state: BehaviorState,
    pub hit_count: u32,
    pub is_transformed: bool,
    pub hiding_spot: Option<Vec3>,
    /// Seconds of white flash left after a revert
    pub revert_flash_remaining: f32,
    wander_target: Vec3,
    alert_timer: f32,
    stats: AnimalStats,
}

impl Animal {
    /// Place a horse on the ground at (x, z)
    pub fn new(id: u32, kind: AnimalKind, x: f32, z: f32, rng: &mut Pcg32) -> Self {
        let position = terrain::ground_point(x, z);
        let mut animal = Self {
            id,
            kind,
            position,
            rotation: 0.0,
            velocity: Vec3::ZERO,
            radius: ANIMAL_RADIUS,
            state: BehaviorState::Grazing,
            hit_count: 0,
            is_transformed: false,
            hiding_spot: None,
            revert_flash_remaining: 0.0,
            wander_target: position,
            alert_timer: 0.0,
            stats: kind.stats(),
        };
        animal.pick_wander_target(rng);
        animal
    }

    pub fn stats(&self) -> &AnimalStats {
        &self.stats
    }

    pub fn wander_target(&self) -> Vec3 {
        self.wander_target
    }

    /// Unit forward vector from the current heading
    pub fn forward(&self) -> Vec3 {
        heading_to_forward(self.rotation)
    }

    /// Advance the state machine by `dt`
    pub fn update(&mut self, dt: f32, player_pos: Vec3, obstacles: &[Obstacle], rng: &mut Pcg32) {
        if self.revert_flash_remaining > 0.0 {
            self.revert_flash_remaining = (self.revert_flash_remaining - dt).max(0.0);
        }
        if self.is_transformed {
            return;
        }

        match self.state {
            BehaviorState::Grazing => {
                self.update_grazing(dt, rng);
                if self.can_see(player_pos) {
                    log::debug!("horse {} spotted the player", self.id);
                    self.state = BehaviorState::Alert;
                    self.alert_timer = 0.0;
                }
            }
            BehaviorState::Alert => {
                self.velocity = Vec3::ZERO;
                self.alert_timer += dt;
                self.look_at(player_pos);
                if self.alert_timer > self.stats.alert_duration {
                    self.state = BehaviorState::Fleeing;
                    self.hiding_spot = find_hiding_spot(self.position, player_pos, obstacles);
                    log::debug!(
                        "horse {} fleeing toward {:?}",
                        self.id,
                        self.hiding_spot
                    );
                }
            }
            BehaviorState::Fleeing => {
                self.update_fleeing(dt, player_pos);
                if let Some(spot) = self.hiding_spot
                    && planar_distance(self.position, spot) < ARRIVE_RADIUS
                {
                    self.state = BehaviorState::Hiding;
                    self.velocity = Vec3::ZERO;
                }
            }
            BehaviorState::Hiding => {
                if !self.can_see(player_pos) {
                    self.state = BehaviorState::Grazing;
                    self.pick_wander_target(rng);
                }
            }
        }

        if self.velocity.length() > 0.01 {
            let target = forward_to_heading(self.velocity);
            self.rotation = lerp_angle(self.rotation, target, (dt * ANIMAL_TURN_RATE).min(1.0));
        }

        terrain::clamp_to_bounds(&mut self.position, WORLD_HALF_EXTENT);
        terrain::snap_to_ground(&mut self.position);
    }

    fn update_grazing(&mut self, dt: f32, rng: &mut Pcg32) {
        let to_target = planar(self.wander_target) - planar(self.position);
        let distance = to_target.length();
        if distance < ARRIVE_RADIUS {
            self.velocity = Vec3::ZERO;
            self.pick_wander_target(rng);
            return;
        }
        let dir = to_target / distance;
        let speed = self.stats.speed * ANIMAL_GRAZE_SPEED_FACTOR;
        self.velocity = Vec3::new(dir.x, 0.0, dir.y) * speed;
        self.position += self.velocity * dt;
    }

    fn update_fleeing(&mut self, dt: f32, player_pos: Vec3) {
        let target = match self.hiding_spot {
            Some(spot) => spot,
            None => {
                let mut away = planar(self.position) - planar(player_pos);
                if away.length_squared() <= f32::EPSILON {
                    away = planar(self.forward());
                }
                let away = away.normalize_or_zero();
                self.position + Vec3::new(away.x, 0.0, away.y) * FLEE_LOOKAHEAD
            }
        };
        let dir = (planar(target) - planar(self.position)).normalize_or_zero();
        self.velocity = Vec3::new(dir.x, 0.0, dir.y) * self.stats.speed;
        self.position += self.velocity * dt;
    }

    /// Vision cone test against the player
    pub fn can_see(&self, player_pos: Vec3) -> bool {
        let to_player = planar(player_pos) - planar(self.position);
        let distance = to_player.length();
        if distance > self.stats.vision_distance {
            return false;
        }
        if distance <= f32::EPSILON {
            return true;
        }
        let forward = planar(self.forward());
        let dot = (forward.dot(to_player / distance)).clamp(-1.0, 1.0);
        let angle = dot.acos();
        angle <= self.stats.vision_angle.to_radians() / 2.0
    }

    fn look_at(&mut self, target: Vec3) {
        let dir = target - self.position;
        if planar(dir).length_squared() > f32::EPSILON {
            self.rotation = forward_to_heading(dir);
        }
    }

    fn pick_wander_target(&mut self, rng: &mut Pcg32) {
        let x = self.position.x + (rng.random::<f32>() - 0.5) * ANIMAL_WANDER_RANGE;
        let z = self.position.z + (rng.random::<f32>() - 0.5) * ANIMAL_WANDER_RANGE;
        self.wander_target = Vec3::new(x, 0.0, z);
    }

    /// Register a hit; true once enough hits have landed to transform
    pub fn hit(&mut self) -> bool {
        self.hit_count += 1;
        self.hit_count >= self.stats.hits_required
    }

    /// Turn into a unicorn
    pub fn transform(&mut self) {
        self.is_transformed = true;
        self.velocity = Vec3::ZERO;
        self.hiding_spot = None;
    }

    /// Undo a transformation; false if the horse was not transformed
    pub fn revert(&mut self, rng: &mut Pcg32) -> bool {
        if !self.is_transformed {
            return false;
        }
        self.is_transformed = false;
        self.hit_count = 0;
        self.state = BehaviorState::Grazing;
        self.hiding_spot = None;
        self.revert_flash_remaining = REVERT_FLASH_DURATION;
        self.pick_wander_target(rng);
        true
    }
}

/// Pick the obstacle whose far side (away from the threat) is closest
///
/// Each obstacle is scored by the distance from `from` to the point
/// `COVER_OFFSET` behind it along the threat-to-obstacle line.
pub fn find_hiding_spot(from: Vec3, threat: Vec3, obstacles: &[Obstacle]) -> Option<Vec3> {
    let mut best: Option<Vec3> = None;
    let mut best_score = f32::INFINITY;

    for obstacle in obstacles {
        let away = (obstacle.position - threat).normalize_or_zero();
        let cover = obstacle.position + away * COVER_OFFSET;
        let score = from.distance(cover);
        if score < best_score {
            best_score = score;
            best = Some(cover);
        }
    }

    best
}
