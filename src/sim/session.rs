//! Per-level session counters and scoring

use serde::{Deserialize, Serialize};

/// Accuracy needed for three stars (with par)
pub const THREE_STAR_ACCURACY: f32 = 0.85;
/// Accuracy that alone earns two stars
pub const TWO_STAR_ACCURACY: f32 = 0.70;

/// Counters for the level in progress
///
/// Reset wholesale on level load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub level_id: u32,
    pub projectiles_fired: u32,
    pub animals_remaining: u32,
    pub total_animals: u32,
    /// Game seconds since level start (frozen on completion)
    pub elapsed: f32,
    pub par_time: f32,
    pub is_paused: bool,
    pub is_complete: bool,
    /// Set once completion has been reported
    pub stars: Option<u8>,
}

impl SessionState {
    pub fn new(level_id: u32, total_animals: u32, par_time: f32) -> Self {
        Self {
            level_id,
            animals_remaining: total_animals,
            total_animals,
            par_time,
            ..Default::default()
        }
    }

    /// Animals transformed so far
    pub fn transformed(&self) -> u32 {
        self.total_animals.saturating_sub(self.animals_remaining)
    }

    pub fn accuracy(&self) -> f32 {
        accuracy(self.total_animals, self.projectiles_fired)
    }
}

/// Animals per shot, capped at 1 (no shots counts as perfect)
pub fn accuracy(total_animals: u32, projectiles_fired: u32) -> f32 {
    if projectiles_fired == 0 {
        return 1.0;
    }
    (total_animals as f32 / projectiles_fired as f32).min(1.0)
}

/// One to three stars from accuracy and par time
pub fn star_rating(total_animals: u32, projectiles_fired: u32, elapsed: f32, par_time: f32) -> u8 {
    let accuracy = accuracy(total_animals, projectiles_fired);
    let under_par = elapsed <= par_time;
    if under_par && accuracy >= THREE_STAR_ACCURACY {
        3
    } else if under_par || accuracy >= TWO_STAR_ACCURACY {
        2
    } else {
        1
    }
}

/// What persistence hears when a level is cleared
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelCompletion {
    pub level_id: u32,
    pub stars: u8,
    pub projectiles_fired: u32,
    pub animals_transformed: u32,
    pub time: f32,
}
