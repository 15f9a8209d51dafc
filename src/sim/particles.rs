//! Fixed-capacity particle pool
//!
//! All slots are allocated up front. Emission claims slots from a free
//! stack and retirement pushes them back, so steady-state play never
//! allocates. An exhausted pool emits fewer particles than asked for.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Visual effect families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParticleEffect {
    HeartTrail,
    Starburst,
    Transformation,
    MuzzleFlash,
    Confetti,
    EggSplat,
    Smoke,
    Revert,
    HenPoof,
}

/// Per-effect tuning
#[derive(Debug, Clone, Copy)]
pub struct EffectConfig {
    /// Particles emitted when no count is given
    pub count: usize,
    pub lifetime: f32,
    pub size: f32,
    pub speed: f32,
    /// Downward acceleration; negative values float upward
    pub gravity: f32,
    pub colors: &'static [u32],
}

impl ParticleEffect {
    pub fn config(&self) -> EffectConfig {
        match self {
            ParticleEffect::HeartTrail => EffectConfig {
                count: 100,
                lifetime: 0.5,
                size: 0.1,
                speed: 0.5,
                gravity: -0.5,
                colors: &[0xff69b4, 0xffb6c1],
            },
            ParticleEffect::Starburst => EffectConfig {
                count: 200,
                lifetime: 1.0,
                size: 0.15,
                speed: 5.0,
                gravity: 2.0,
                colors: &[0xff69b4, 0xffd700, 0xffffff, 0x87ceeb],
            },
            ParticleEffect::Transformation => EffectConfig {
                count: 300,
                lifetime: 1.5,
                size: 0.2,
                speed: 3.0,
                gravity: -1.0,
                colors: &[0xff0000, 0xff7f00, 0xffff00, 0x00ff00, 0x0000ff, 0x8b00ff],
            },
            ParticleEffect::MuzzleFlash => EffectConfig {
                count: 50,
                lifetime: 0.3,
                size: 0.08,
                speed: 3.0,
                gravity: 0.0,
                colors: &[0xff69b4, 0xffd700],
            },
            ParticleEffect::Confetti => EffectConfig {
                count: 200,
                lifetime: 3.0,
                size: 0.35,
                speed: 10.0,
                gravity: 5.0,
                colors: &[
                    0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0xff00ff, 0x00ffff, 0xff8800, 0xff69b4,
                ],
            },
            ParticleEffect::EggSplat => EffectConfig {
                count: 80,
                lifetime: 1.5,
                size: 0.25,
                speed: 7.0,
                gravity: 6.0,
                colors: &[0xffff00, 0xfff8dc, 0xffa500, 0xffcc00],
            },
            ParticleEffect::Smoke => EffectConfig {
                count: 100,
                lifetime: 1.5,
                size: 0.5,
                speed: 4.0,
                gravity: -3.0,
                colors: &[0x888888, 0xaaaaaa, 0xcccccc, 0x666666, 0xffffff],
            },
            ParticleEffect::Revert => EffectConfig {
                count: 150,
                lifetime: 1.2,
                size: 0.3,
                speed: 7.0,
                gravity: 4.0,
                colors: &[0x8b4513, 0xa0522d, 0xd2691e, 0xffffff, 0x888888, 0xffff00],
            },
            ParticleEffect::HenPoof => EffectConfig {
                count: 60,
                lifetime: 1.0,
                size: 0.15,
                speed: 4.0,
                gravity: 2.0,
                colors: &[0xffffff, 0xfff8dc, 0xffa500, 0xff6600],
            },
        }
    }
}

/// A pooled particle slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Euler spin (presentation)
    pub rotation: Vec3,
    pub lifetime: f32,
    pub max_lifetime: f32,
    pub active: bool,
    pub effect: ParticleEffect,
    pub color: u32,
    pub base_scale: f32,
    pub scale: f32,
    pub opacity: f32,
}

impl Particle {
    fn idle() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            rotation: Vec3::ZERO,
            lifetime: 0.0,
            max_lifetime: 0.0,
            active: false,
            effect: ParticleEffect::Starburst,
            color: 0xffffff,
            base_scale: 0.0,
            scale: 0.0,
            opacity: 0.0,
        }
    }

    /// 0 at emission, 1 at expiry
    pub fn progress(&self) -> f32 {
        if self.max_lifetime <= 0.0 {
            return 1.0;
        }
        (1.0 - self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
    }
}

/// Spin rates (radians/sec) around x and z
const SPIN_X: f32 = 3.0;
const SPIN_Z: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    /// Indices of inactive slots (stack)
    free: Vec<usize>,
    /// Indices of active slots, emission order
    active: Vec<usize>,
}

impl ParticlePool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::idle(); capacity],
            free: (0..capacity).rev().collect(),
            active: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Active particles in emission order
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.active.iter().map(|&i| &self.slots[i])
    }

    /// Emit up to `count` particles (effect default if `None`)
    ///
    /// Returns how many were actually emitted.
    pub fn emit(
        &mut self,
        effect: ParticleEffect,
        origin: Vec3,
        count: Option<usize>,
        rng: &mut Pcg32,
    ) -> usize {
        let config = effect.config();
        let requested = count.unwrap_or(config.count);
        let mut emitted = 0;

        while emitted < requested {
            let Some(index) = self.free.pop() else {
                break;
            };
            self.slots[index] = spawn_particle(effect, &config, origin, rng);
            self.active.push(index);
            emitted += 1;
        }

        if emitted < requested {
            log::trace!(
                "particle pool exhausted: {:?} wanted {} got {}",
                effect,
                requested,
                emitted
            );
        }
        emitted
    }

    /// Integrate and retire expired particles
    ///
    /// Survivors keep their emission order.
    pub fn update(&mut self, dt: f32) {
        let Self {
            slots,
            free,
            active,
        } = self;

        active.retain(|&index| {
            let p = &mut slots[index];
            p.lifetime -= dt;

            if p.lifetime <= 0.0 {
                p.active = false;
                p.opacity = 0.0;
                free.push(index);
                return false;
            }

            p.position += p.velocity * dt;
            p.velocity.y -= p.effect.config().gravity * dt;
            p.rotation.x += dt * SPIN_X;
            p.rotation.z += dt * SPIN_Z;

            let progress = p.progress();
            p.opacity = 1.0 - progress;
            p.scale = p.base_scale * (1.0 - progress * 0.5);
            true
        });
    }

    /// Return every slot to the free stack
    pub fn clear(&mut self) {
        for &index in &self.active {
            self.slots[index].active = false;
            self.free.push(index);
        }
        self.active.clear();
    }
}

fn spawn_particle(
    effect: ParticleEffect,
    config: &EffectConfig,
    origin: Vec3,
    rng: &mut Pcg32,
) -> Particle {
    let position = Vec3::new(
        origin.x + (rng.random::<f32>() - 0.5) * 0.5,
        origin.y + 1.5 + rng.random::<f32>() * 0.5,
        origin.z + (rng.random::<f32>() - 0.5) * 0.5,
    );

    let lifetime = config.lifetime * (0.7 + rng.random::<f32>() * 0.6);

    // Explode outward, biased upward
    let theta = rng.random::<f32>() * TAU;
    let phi = rng.random::<f32>() * PI * 0.8;
    let velocity = Vec3::new(
        phi.sin() * theta.cos() * config.speed * (0.7 + rng.random::<f32>() * 0.6),
        phi.cos().abs() * config.speed * (0.5 + rng.random::<f32>()),
        phi.sin() * theta.sin() * config.speed * (0.7 + rng.random::<f32>() * 0.6),
    );

    let color = config.colors[rng.random_range(0..config.colors.len())];
    let base_scale = config.size * (0.8 + rng.random::<f32>() * 0.4);

    Particle {
        position,
        velocity,
        rotation: Vec3::new(
            rng.random::<f32>() * PI,
            rng.random::<f32>() * PI,
            rng.random::<f32>() * PI,
        ),
        lifetime,
        max_lifetime: lifetime,
        active: true,
        effect,
        color,
        base_scale,
        scale: base_scale,
        opacity: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_exhaustion_emits_free_count() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut pool = ParticlePool::with_capacity(50);
        assert_eq!(pool.emit(ParticleEffect::Smoke, Vec3::ZERO, Some(30), &mut rng), 30);
        assert_eq!(pool.free_count(), 20);

        let got = pool.emit(ParticleEffect::Confetti, Vec3::ZERO, Some(100), &mut rng);
        assert_eq!(got, 20);
        assert_eq!(pool.active_count(), 50);
        assert_eq!(pool.free_count(), 0);
        assert_eq!(pool.emit(ParticleEffect::Starburst, Vec3::ZERO, None, &mut rng), 0);
    }

    #[test]
    fn test_default_count() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut pool = ParticlePool::with_capacity(1000);
        let n = pool.emit(ParticleEffect::EggSplat, Vec3::ZERO, None, &mut rng);
        assert_eq!(n, 80);
    }

    #[test]
    fn test_expired_particles_return_to_pool() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut pool = ParticlePool::with_capacity(20);
        pool.emit(ParticleEffect::MuzzleFlash, Vec3::ZERO, Some(20), &mut rng);
        // Max lifetime is 0.3 * 1.3
        pool.update(0.2);
        assert!(pool.iter().all(|p| p.opacity < 1.0 && p.scale < p.base_scale));
        pool.update(0.2);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.free_count(), 20);
        assert_eq!(pool.capacity(), 20);
    }

    #[test]
    fn test_retiring_keeps_survivor_order() {
        let mut pool = ParticlePool::with_capacity(100);
        let mut rng = Pcg32::seed_from_u64(8);
        pool.emit(ParticleEffect::Confetti, Vec3::ZERO, Some(5), &mut rng);
        pool.emit(ParticleEffect::MuzzleFlash, Vec3::ZERO, Some(5), &mut rng);
        pool.emit(ParticleEffect::Confetti, Vec3::ZERO, Some(5), &mut rng);
        let expected: Vec<f32> = pool
            .iter()
            .filter(|p| p.effect == ParticleEffect::Confetti)
            .map(|p| p.base_scale)
            .collect();

        // Muzzle flashes live at most 0.39s, confetti at least 2.1s
        pool.update(0.5);
        let survivors: Vec<f32> = pool.iter().map(|p| p.base_scale).collect();
        assert_eq!(survivors, expected);
        assert_eq!(pool.free_count(), 90);
    }

    #[test]
    fn test_gravity_sign() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut pool = ParticlePool::with_capacity(2);
        pool.emit(ParticleEffect::Confetti, Vec3::ZERO, Some(1), &mut rng);
        let vy = pool.iter().next().map(|p| p.velocity.y).unwrap_or_default();
        pool.update(0.1);
        let after = pool.iter().next().map(|p| p.velocity.y).unwrap_or_default();
        assert!((vy - after - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_zero_capacity_pool() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut pool = ParticlePool::with_capacity(0);
        assert_eq!(pool.emit(ParticleEffect::Smoke, Vec3::ZERO, None, &mut rng), 0);
        pool.update(0.016);
    }

    #[test]
    fn test_clear_frees_everything() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut pool = ParticlePool::with_capacity(40);
        pool.emit(ParticleEffect::Revert, Vec3::ZERO, None, &mut rng);
        pool.clear();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.free_count(), 40);
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_capacity(
            capacity in 0usize..300,
            requests in proptest::collection::vec((0usize..200, 0.0f32..0.5), 1..20),
        ) {
            let mut rng = Pcg32::seed_from_u64(1);
            let mut pool = ParticlePool::with_capacity(capacity);
            for (count, dt) in requests {
                let free = pool.free_count();
                let got = pool.emit(ParticleEffect::Starburst, Vec3::ZERO, Some(count), &mut rng);
                prop_assert_eq!(got, count.min(free));
                pool.update(dt);
                prop_assert_eq!(pool.active_count() + pool.free_count(), capacity);
            }
        }
    }
}
