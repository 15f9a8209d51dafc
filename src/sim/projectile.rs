//! Hearts (player shots) and eggs (hen shots)
//!
//! Both travel in a straight line at a fixed speed until their lifetime
//! runs out or they hit something once. Homing hearts bend toward the
//! nearest untransformed horse, re-picked every frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{forward_to_heading, heading_to_forward, planar_distance};

/// Who fired the projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectileOwner {
    /// Heart: transforms horses, roasts hens
    Player,
    /// Egg: reverts unicorns
    Hazard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: ProjectileOwner,
    pub position: Vec3,
    /// Always unit length
    pub direction: Vec3,
    pub speed: f32,
    /// Seconds left before expiring
    pub lifetime: f32,
    pub homing: bool,
    /// Current homing target (animal id)
    pub target: Option<u32>,
    pub active: bool,
}

impl Projectile {
    /// A heart fired by the player
    pub fn heart(id: u32, origin: Vec3, direction: Vec3, homing: bool) -> Self {
        Self {
            id,
            owner: ProjectileOwner::Player,
            position: origin,
            direction: direction.try_normalize().unwrap_or(Vec3::Z),
            speed: HEART_SPEED,
            lifetime: HEART_LIFETIME,
            homing,
            target: None,
            active: true,
        }
    }

    /// An egg thrown by a hen
    pub fn egg(id: u32, origin: Vec3, direction: Vec3) -> Self {
        Self {
            id,
            owner: ProjectileOwner::Hazard,
            position: origin,
            direction: direction.try_normalize().unwrap_or(Vec3::Z),
            speed: EGG_SPEED,
            lifetime: EGG_LIFETIME,
            homing: false,
            target: None,
            active: true,
        }
    }

    /// Planar hit radius against this projectile's victims
    pub fn hit_radius(&self) -> f32 {
        match self.owner {
            ProjectileOwner::Player => HEART_HIT_RADIUS,
            ProjectileOwner::Hazard => EGG_HIT_RADIUS,
        }
    }

    /// Advance one frame
    ///
    /// `target_pos` is the resolved position of the homing target this
    /// frame; non-homing projectiles ignore it. With no target the
    /// projectile keeps its last direction.
    pub fn update(&mut self, dt: f32, target_pos: Option<Vec3>) {
        if !self.active {
            return;
        }

        if self.homing
            && let Some(target) = target_pos
        {
            self.steer_toward(target, dt);
        }

        self.position += self.direction * self.speed * dt;
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            self.active = false;
        }
    }

    /// Bend the direction toward `target` at a bounded rate
    fn steer_toward(&mut self, target: Vec3, dt: f32) {
        let Some(desired) = (target - self.position).try_normalize() else {
            return;
        };
        let t = (HEART_TURN_RATE * dt).clamp(0.0, 1.0);
        // Opposite vectors can lerp through zero; keep the old heading then
        if let Some(dir) = self.direction.lerp(desired, t).try_normalize() {
            self.direction = dir;
        }
    }

    /// Mark spent (at most one hit per projectile)
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Nearest candidate by planar distance
///
/// Ties keep the earliest candidate so iteration order decides.
pub fn nearest_target(from: Vec3, candidates: impl Iterator<Item = (u32, Vec3)>) -> Option<u32> {
    let mut best: Option<(u32, f32)> = None;
    for (id, pos) in candidates {
        let d = planar_distance(from, pos);
        match best {
            Some((_, best_d)) if best_d <= d => {}
            _ => best = Some((id, d)),
        }
    }
    best.map(|(id, _)| id)
}

/// Shot directions for one trigger pull
///
/// Single mode fires along `facing`. Multi-shot fans three shots at
/// -15, 0 and +15 degrees around it.
pub fn spread_directions(facing: Vec3, multi_shot: bool) -> Vec<Vec3> {
    let facing = Vec3::new(facing.x, 0.0, facing.z)
        .try_normalize()
        .unwrap_or(Vec3::Z);
    if !multi_shot {
        return vec![facing];
    }
    let heading = forward_to_heading(facing);
    [-SPREAD_ANGLE, 0.0, SPREAD_ANGLE]
        .iter()
        .map(|offset| heading_to_forward(heading + offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_straight_flight_and_expiry() {
        let mut heart = Projectile::heart(1, Vec3::ZERO, Vec3::Z, false);
        heart.update(1.0, Some(Vec3::new(100.0, 0.0, 0.0)));
        assert!((heart.position - Vec3::new(0.0, 0.0, HEART_SPEED)).length() < 1e-4);
        heart.update(1.0, None);
        heart.update(1.0, None);
        assert!(!heart.active);
    }

    #[test]
    fn test_homing_curves_gradually() {
        let mut heart = Projectile::heart(1, Vec3::ZERO, Vec3::Z, true);
        let target = Vec3::new(20.0, 0.0, 0.0);
        heart.update(1.0 / 60.0, Some(target));
        // Turned toward +x but nowhere near a snap
        assert!(heart.direction.x > 0.0);
        assert!(heart.direction.z > 0.9);
    }

    #[test]
    fn test_homing_without_target_keeps_direction() {
        let dir = Vec3::new(1.0, 0.0, 1.0).normalize();
        let mut heart = Projectile::heart(1, Vec3::ZERO, dir, true);
        heart.update(0.1, None);
        assert!((heart.direction - dir).length() < 1e-6);
    }

    #[test]
    fn test_homing_opposite_target_no_nan() {
        let mut heart = Projectile::heart(1, Vec3::ZERO, Vec3::Z, true);
        // Halfway between opposite vectors is (close to) zero
        heart.update(1.0 / 6.0, Some(Vec3::new(0.0, 0.0, -50.0)));
        assert!(heart.direction.is_finite());
        assert!((heart.direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_direction_falls_back() {
        let egg = Projectile::egg(1, Vec3::ZERO, Vec3::ZERO);
        assert_eq!(egg.direction, Vec3::Z);
        assert_eq!(egg.hit_radius(), EGG_HIT_RADIUS);
    }

    #[test]
    fn test_nearest_target_is_planar() {
        let candidates = vec![
            (1, Vec3::new(0.0, 50.0, 3.0)),
            (2, Vec3::new(0.0, 0.0, 4.0)),
            (3, Vec3::new(10.0, 0.0, 0.0)),
        ];
        assert_eq!(nearest_target(Vec3::ZERO, candidates.into_iter()), Some(1));
        assert_eq!(nearest_target(Vec3::ZERO, std::iter::empty()), None);
    }

    #[test]
    fn test_spread_directions() {
        assert_eq!(spread_directions(Vec3::Z, false).len(), 1);
        let dirs = spread_directions(Vec3::Z, true);
        assert_eq!(dirs.len(), 3);
        assert!((dirs[1] - Vec3::Z).length() < 1e-5);
        assert!((dirs[0].angle_between(dirs[2]) - 2.0 * SPREAD_ANGLE).abs() < 1e-4);
        assert!(spread_directions(Vec3::ZERO, true).iter().all(|d| d.is_finite()));
    }

    proptest! {
        #[test]
        fn prop_homing_direction_stays_unit(
            dx in -1.0f32..1.0, dz in -1.0f32..1.0,
            tx in -40.0f32..40.0, ty in -5.0f32..5.0, tz in -40.0f32..40.0,
            dt in 0.0f32..0.5,
            steps in 1usize..40,
        ) {
            let mut heart = Projectile::heart(1, Vec3::new(0.0, 1.2, 0.0), Vec3::new(dx, 0.0, dz), true);
            let target = Vec3::new(tx, ty, tz);
            for _ in 0..steps {
                heart.update(dt, Some(target));
                prop_assert!((heart.direction.length() - 1.0).abs() < 1e-4);
            }
        }
    }
}
