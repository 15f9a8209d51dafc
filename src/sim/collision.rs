//! Collision detection and response on the ground plane
//!
//! Everything collides as circles in (x, z). Movers are pushed straight out
//! of each obstacle in turn; overlaps are resolved sequentially, so a push
//! out of one obstacle may nudge the mover into another at tight corners.

use glam::{Vec2, Vec3};

use super::obstacle::Obstacle;
use super::terrain;
use crate::consts::PUSH_EPSILON;
use crate::planar;

/// Result of a circle-circle check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the circles overlap
    pub hit: bool,
    /// Unit normal from the obstacle center toward the mover
    pub normal: Vec2,
    /// Overlap depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a mover circle against a fixed circle
///
/// A zero radius fixed circle never collides. Coincident centers push out
/// along +x so the result is always finite.
pub fn circle_contact(mover: Vec2, mover_radius: f32, center: Vec2, radius: f32) -> CollisionResult {
    if radius <= 0.0 {
        return CollisionResult::miss();
    }
    let delta = mover - center;
    let distance = delta.length();
    let min_dist = mover_radius + radius;
    if distance >= min_dist {
        return CollisionResult::miss();
    }
    let normal = if distance > f32::EPSILON {
        delta / distance
    } else {
        Vec2::X
    };
    CollisionResult {
        hit: true,
        normal,
        penetration: min_dist - distance,
    }
}

/// Push a mover out of every overlapping obstacle, clamp it into the world
/// square and resnap it to the ground.
///
/// Returns the number of obstacles that pushed.
pub fn resolve_obstacles(
    position: &mut Vec3,
    radius: f32,
    obstacles: &[Obstacle],
    half_extent: f32,
) -> usize {
    let mut pushes = 0;
    for obstacle in obstacles {
        let contact = circle_contact(
            planar(*position),
            radius,
            planar(obstacle.position),
            obstacle.collision_radius,
        );
        if contact.hit {
            let push = contact.normal * (contact.penetration + PUSH_EPSILON);
            position.x += push.x;
            position.z += push.y;
            pushes += 1;
        }
    }

    terrain::clamp_to_bounds(position, half_extent);
    terrain::snap_to_ground(position);
    pushes
}

/// Planar point-in-circle test used by projectiles
#[inline]
pub fn within_planar_radius(a: Vec3, b: Vec3, radius: f32) -> bool {
    planar(a).distance_squared(planar(b)) < radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::WORLD_HALF_EXTENT;
    use crate::sim::obstacle::ObstacleKind;
    use proptest::prelude::*;

    fn obstacle_at(kind: ObstacleKind, x: f32, z: f32) -> Obstacle {
        Obstacle::new(kind, terrain::ground_point(x, z), 0)
    }

    #[test]
    fn test_push_out_of_tree() {
        let tree = obstacle_at(ObstacleKind::Tree, 0.0, 0.0);
        let mut pos = terrain::ground_point(1.0, 0.0);
        let pushes = resolve_obstacles(&mut pos, 0.4, &[tree], WORLD_HALF_EXTENT);
        assert_eq!(pushes, 1);
        // 1.5 + 0.4 plus epsilon
        assert!((pos.x - 2.0).abs() < 1e-4);
        assert_eq!(pos.y, terrain::height_at(pos.x, pos.z));
    }

    #[test]
    fn test_coincident_center_is_finite() {
        let rock = obstacle_at(ObstacleKind::VolcanicRock, 5.0, 5.0);
        let mut pos = rock.position;
        resolve_obstacles(&mut pos, 0.8, &[rock.clone()], WORLD_HALF_EXTENT);
        assert!(pos.is_finite());
        assert!(planar_dist(pos, rock.position) >= 2.8 - 1e-4);
    }

    #[test]
    fn test_world_bounds_clamp() {
        let mut pos = Vec3::new(60.0, 0.0, -60.0);
        resolve_obstacles(&mut pos, 0.4, &[], WORLD_HALF_EXTENT);
        assert_eq!(pos.x, WORLD_HALF_EXTENT);
        assert_eq!(pos.z, -WORLD_HALF_EXTENT);
    }

    #[test]
    fn test_within_planar_radius_ignores_height() {
        let a = Vec3::new(0.0, 10.0, 0.0);
        let b = Vec3::new(1.0, -10.0, 0.0);
        assert!(within_planar_radius(a, b, 1.5));
        assert!(!within_planar_radius(a, b, 1.0));
    }

    fn planar_dist(a: Vec3, b: Vec3) -> f32 {
        crate::planar_distance(a, b)
    }

    proptest! {
        #[test]
        fn prop_zero_radius_never_moves_mover(
            ox in -30.0f32..30.0, oz in -30.0f32..30.0,
            mx in -30.0f32..30.0, mz in -30.0f32..30.0,
            r in 0.1f32..2.0,
        ) {
            let mud = obstacle_at(ObstacleKind::Mud, ox, oz);
            let start = terrain::ground_point(mx, mz);
            let mut pos = start;
            let pushes = resolve_obstacles(&mut pos, r, &[mud], WORLD_HALF_EXTENT);
            prop_assert_eq!(pushes, 0);
            prop_assert_eq!(pos, start);
        }

        #[test]
        fn prop_no_residual_overlap(
            ox in -30.0f32..30.0, oz in -30.0f32..30.0,
            dx in -3.0f32..3.0, dz in -3.0f32..3.0,
            r in 0.1f32..1.0,
        ) {
            let tree = obstacle_at(ObstacleKind::Tree, ox, oz);
            let mut pos = terrain::ground_point(ox + dx, oz + dz);
            resolve_obstacles(&mut pos, r, &[tree.clone()], WORLD_HALF_EXTENT);
            let sum = r + tree.collision_radius;
            prop_assert!(planar_dist(pos, tree.position) >= sum - PUSH_EPSILON);
        }
    }
}
