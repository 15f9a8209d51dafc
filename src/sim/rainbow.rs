//! Celebration rainbows left behind by transformations

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub const RAINBOW_LIFETIME: f32 = 3.0;
/// Fading starts when this much lifetime is left
pub const RAINBOW_FADE: f32 = 2.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rainbow {
    pub position: Vec3,
    pub remaining: f32,
}

impl Rainbow {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            remaining: RAINBOW_LIFETIME,
        }
    }

    pub fn opacity(&self) -> f32 {
        if self.remaining >= RAINBOW_FADE {
            1.0
        } else {
            (self.remaining / RAINBOW_FADE).max(0.0)
        }
    }

    pub fn is_alive(&self) -> bool {
        self.remaining > 0.0
    }
}

/// Age every rainbow and drop the expired ones
pub fn update_rainbows(rainbows: &mut Vec<Rainbow>, dt: f32) {
    for rainbow in rainbows.iter_mut() {
        rainbow.remaining -= dt;
    }
    rainbows.retain(Rainbow::is_alive);
}
