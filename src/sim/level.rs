//! Level configuration
//!
//! Levels are plain data. The nine built-in levels ship embedded as JSON;
//! other catalogs can be parsed from any JSON string in the same shape.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::animal::AnimalKind;
use super::obstacle::ObstacleKind;
use super::terrain;
use crate::consts::WORLD_HALF_EXTENT;

const BUILTIN_LEVELS: &str = include_str!("../../data/levels.json");

/// Most hens a single level may spawn
pub const MAX_HAZARDS: u32 = 32;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("unknown level {0}")]
    UnknownLevel(u32),
    #[error("malformed level data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level {level}: {what} is outside the world")]
    InvalidPosition { level: u32, what: String },
    #[error("level catalog is empty")]
    Empty,
    #[error("level {0} has no animals")]
    NoAnimals(u32),
    #[error("level {0} has an invalid par time")]
    InvalidParTime(u32),
    #[error("level {level} asks for {count} hens (at most {max})", max = MAX_HAZARDS)]
    TooManyHazards { level: u32, count: u32 },
}

/// Visual theme (presentation picks palettes and props from this)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    Meadow,
    Forest,
    Castle,
    Desert,
    Winter,
    Swamp,
    Volcano,
    Beach,
    Haunted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalSpawn {
    pub kind: AnimalKind,
    pub position: Vec3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSpawn {
    pub kind: ObstacleKind,
    pub position: Vec3,
    #[serde(default)]
    pub variant: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    pub id: u32,
    pub name: String,
    pub theme: Theme,
    /// Seconds; finishing at or under par counts toward stars
    pub par_time: f32,
    pub player_start: Vec3,
    pub animals: Vec<AnimalSpawn>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpawn>,
    /// Hen count override (default: level id + 1)
    #[serde(default)]
    pub hazards: Option<u32>,
}

impl LevelConfig {
    /// Number of hens to spawn (never more than `MAX_HAZARDS`)
    pub fn hazard_count(&self) -> u32 {
        self.hazards
            .unwrap_or(self.id.saturating_add(1))
            .min(MAX_HAZARDS)
    }

    /// Check that the level can be played
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.animals.is_empty() {
            return Err(LevelError::NoAnimals(self.id));
        }
        let check = |pos: Vec3, what: String| {
            if terrain::in_bounds(pos.x, pos.z, WORLD_HALF_EXTENT) {
                Ok(())
            } else {
                Err(LevelError::InvalidPosition {
                    level: self.id,
                    what,
                })
            }
        };
        check(self.player_start, "player start".to_string())?;
        for (i, animal) in self.animals.iter().enumerate() {
            check(animal.position, format!("animal {i}"))?;
        }
        for (i, obstacle) in self.obstacles.iter().enumerate() {
            check(obstacle.position, format!("obstacle {i}"))?;
        }
        if !self.par_time.is_finite() || self.par_time <= 0.0 {
            return Err(LevelError::InvalidParTime(self.id));
        }
        if let Some(count) = self.hazards
            && count > MAX_HAZARDS
        {
            return Err(LevelError::TooManyHazards {
                level: self.id,
                count,
            });
        }
        Ok(())
    }
}

/// An ordered set of levels
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<LevelConfig>,
}

impl LevelCatalog {
    /// The nine shipped levels
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_json(BUILTIN_LEVELS)
    }

    /// Parse a JSON array of levels
    ///
    /// Levels are parsed eagerly but validated on load, so one broken level
    /// doesn't take the whole catalog down.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let levels: Vec<LevelConfig> = serde_json::from_str(json)?;
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }
        Ok(Self { levels })
    }

    pub fn from_levels(levels: Vec<LevelConfig>) -> Self {
        Self { levels }
    }

    pub fn get(&self, id: u32) -> Result<&LevelConfig, LevelError> {
        self.levels
            .iter()
            .find(|l| l.id == id)
            .ok_or(LevelError::UnknownLevel(id))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelConfig> {
        self.levels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_parse_and_validate() {
        let catalog = LevelCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 9);
        let pars: Vec<f32> = catalog.iter().map(|l| l.par_time).collect();
        assert_eq!(pars, vec![120.0, 180.0, 240.0, 150.0, 180.0, 200.0, 180.0, 120.0, 240.0]);
        for level in catalog.iter() {
            level.validate().unwrap();
        }
        assert_eq!(catalog.get(1).unwrap().theme, Theme::Meadow);
        assert_eq!(catalog.get(9).unwrap().theme, Theme::Haunted);
        assert_eq!(catalog.get(4).unwrap().hazard_count(), 5);
    }

    #[test]
    fn test_unknown_level() {
        let catalog = LevelCatalog::builtin().unwrap();
        assert!(matches!(catalog.get(42), Err(LevelError::UnknownLevel(42))));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let json = r#"[{
            "id": 1, "name": "Edge", "theme": "meadow", "parTime": 60,
            "playerStart": [0, 0, 0],
            "animals": [{"kind": "normal", "position": [50, 0, 0]}]
        }]"#;
        let catalog = LevelCatalog::from_json(json).unwrap();
        let err = catalog.get(1).unwrap().validate().unwrap_err();
        assert!(matches!(err, LevelError::InvalidPosition { level: 1, .. }));
    }

    #[test]
    fn test_malformed_and_empty() {
        assert!(matches!(LevelCatalog::from_json("[{"), Err(LevelError::Parse(_))));
        assert!(matches!(LevelCatalog::from_json("[]"), Err(LevelError::Empty)));
        let unknown_kind = r#"[{
            "id": 1, "name": "X", "theme": "meadow", "parTime": 60,
            "playerStart": [0, 0, 0],
            "animals": [{"kind": "dragon", "position": [0, 0, 0]}]
        }]"#;
        assert!(LevelCatalog::from_json(unknown_kind).is_err());
    }

    #[test]
    fn test_hazard_count_is_bounded() {
        let json = r#"[{
            "id": 4294967295, "name": "Far", "theme": "meadow", "parTime": 60,
            "playerStart": [0, 0, 0],
            "animals": [{"kind": "normal", "position": [1, 0, 1]}]
        }]"#;
        let catalog = LevelCatalog::from_json(json).unwrap();
        let level = catalog.get(u32::MAX).unwrap();
        level.validate().unwrap();
        assert_eq!(level.hazard_count(), MAX_HAZARDS);

        let mut flock = level.clone();
        flock.hazards = Some(MAX_HAZARDS + 1);
        assert!(matches!(
            flock.validate(),
            Err(LevelError::TooManyHazards { count, .. }) if count == MAX_HAZARDS + 1
        ));
        flock.hazards = Some(MAX_HAZARDS);
        flock.validate().unwrap();
    }

    #[test]
    fn test_hazard_override() {
        let json = r#"[{
            "id": 3, "name": "Quiet", "theme": "castle", "parTime": 60,
            "playerStart": [0, 0, 0],
            "animals": [{"kind": "shy", "position": [1, 0, 1]}],
            "hazards": 0
        }]"#;
        let catalog = LevelCatalog::from_json(json).unwrap();
        assert_eq!(catalog.get(3).unwrap().hazard_count(), 0);
    }
}
