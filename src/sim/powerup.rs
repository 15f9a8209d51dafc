//! Timed power-ups
//!
//! A random pickup appears every 15 seconds. Walking over it starts (or
//! restarts) that kind's timer.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::within_planar_radius;
use super::terrain;
use crate::consts::SPAWN_HALF_EXTENT;

/// Seconds between pickup spawns
pub const SPAWN_INTERVAL: f32 = 15.0;
/// Planar pickup radius
pub const PICKUP_RADIUS: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    /// Player moves 1.5x faster
    Speed,
    /// Three-way spread shots
    MultiShot,
    /// Hearts seek the nearest horse
    Homing,
    /// Horses run at half speed
    SlowMo,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Speed,
        PowerUpKind::MultiShot,
        PowerUpKind::Homing,
        PowerUpKind::SlowMo,
    ];

    pub fn duration(&self) -> f32 {
        match self {
            PowerUpKind::Speed => 5.0,
            PowerUpKind::MultiShot => 8.0,
            PowerUpKind::Homing => 6.0,
            PowerUpKind::SlowMo => 4.0,
        }
    }

    fn index(&self) -> usize {
        match self {
            PowerUpKind::Speed => 0,
            PowerUpKind::MultiShot => 1,
            PowerUpKind::Homing => 2,
            PowerUpKind::SlowMo => 3,
        }
    }
}

/// A pickup lying on the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub position: Vec3,
}

#[derive(Debug, Clone, Default)]
pub struct PowerUpManager {
    pub pickups: Vec<PowerUp>,
    /// Remaining seconds per kind, indexed by `PowerUpKind::index`
    remaining: [f32; 4],
    spawn_timer: f32,
    next_id: u32,
}

impl PowerUpManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance timers, spawn, and collect. Returns kinds picked up this frame.
    pub fn update(&mut self, dt: f32, player_pos: Vec3, rng: &mut Pcg32) -> Vec<PowerUpKind> {
        self.spawn_timer += dt;
        if self.spawn_timer >= SPAWN_INTERVAL {
            self.spawn_timer = 0.0;
            self.spawn_random(rng);
        }

        let mut collected = Vec::new();
        self.pickups.retain(|pickup| {
            if within_planar_radius(pickup.position, player_pos, PICKUP_RADIUS) {
                collected.push(pickup.kind);
                false
            } else {
                true
            }
        });
        for kind in &collected {
            log::debug!("power-up collected: {:?}", kind);
            self.activate(*kind);
        }

        for remaining in &mut self.remaining {
            if *remaining > 0.0 {
                *remaining = (*remaining - dt).max(0.0);
            }
        }

        collected
    }

    fn spawn_random(&mut self, rng: &mut Pcg32) {
        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        let x = (rng.random::<f32>() - 0.5) * SPAWN_HALF_EXTENT * 2.0;
        let z = (rng.random::<f32>() - 0.5) * SPAWN_HALF_EXTENT * 2.0;
        self.next_id += 1;
        self.pickups.push(PowerUp {
            id: self.next_id,
            kind,
            position: terrain::ground_point(x, z),
        });
    }

    /// Start or restart a power-up timer
    pub fn activate(&mut self, kind: PowerUpKind) {
        self.remaining[kind.index()] = kind.duration();
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.remaining[kind.index()] > 0.0
    }

    pub fn remaining(&self, kind: PowerUpKind) -> f32 {
        self.remaining[kind.index()]
    }

    /// Kinds currently running
    pub fn active_kinds(&self) -> Vec<PowerUpKind> {
        PowerUpKind::ALL
            .into_iter()
            .filter(|k| self.is_active(*k))
            .collect()
    }

    pub fn player_speed_multiplier(&self) -> f32 {
        if self.is_active(PowerUpKind::Speed) { 1.5 } else { 1.0 }
    }

    pub fn animal_time_scale(&self) -> f32 {
        if self.is_active(PowerUpKind::SlowMo) { 0.5 } else { 1.0 }
    }

    pub fn multi_shot(&self) -> bool {
        self.is_active(PowerUpKind::MultiShot)
    }

    pub fn homing(&self) -> bool {
        self.is_active(PowerUpKind::Homing)
    }

    /// Level load
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
