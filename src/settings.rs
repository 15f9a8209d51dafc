//! Game settings and preferences
//!
//! Persisted separately from the save data, under their own key.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::{PersistenceError, SaveBackend};

/// Effect budget presets
///
/// The only thing quality changes in the simulation is how many particles
/// the shared pool may hold at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    /// Sparse confetti for weak devices
    Low,
    #[default]
    Medium,
    /// Every burst at full size
    High,
}

#[derive(Debug, Error)]
#[error("unknown quality preset '{0}' (expected low, medium or high)")]
pub struct UnknownPreset(String);

impl QualityPreset {
    pub const ALL: [QualityPreset; 3] = [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High];

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Particle pool capacity
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 300,
            QualityPreset::Medium => 1000,
            QualityPreset::High => 2000,
        }
    }
}

impl FromStr for QualityPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QualityPreset::ALL
            .into_iter()
            .find(|preset| preset.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

/// Player preferences
///
/// Fields missing from a stored document keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    /// Hearts, confetti, smoke; off empties the pool entirely
    pub particles: bool,
    /// Camera kick on hits, roasts and reverts
    pub screen_shake: bool,
    /// Let the sky move from dawn to night
    pub day_night_cycle: bool,
    /// Rain and fog spells
    pub weather: bool,
    /// Overrides `screen_shake`
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            screen_shake: true,
            day_night_cycle: true,
            weather: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "heartshot_settings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Shake only when reduced motion is off
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Particle pool capacity to build the simulation with
    pub fn max_particles(&self) -> usize {
        if self.particles {
            self.quality.max_particles()
        } else {
            0
        }
    }

    /// Load settings, falling back to defaults on any error
    pub fn load(backend: &dyn SaveBackend) -> Self {
        match backend.read(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Settings unreadable, using defaults: {e}");
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read settings, using defaults: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, backend: &mut dyn SaveBackend) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(self)?;
        backend.write(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryBackend;

    #[test]
    fn test_preset_capacity() {
        assert_eq!(Settings::from_preset(QualityPreset::Low).max_particles(), 300);
        assert_eq!(Settings::default().max_particles(), 1000);
        assert_eq!(Settings::from_preset(QualityPreset::High).max_particles(), 2000);
        let off = Settings {
            particles: false,
            ..Settings::default()
        };
        assert_eq!(off.max_particles(), 0);
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("medium".parse::<QualityPreset>().unwrap(), QualityPreset::Medium);
        assert_eq!(" HIGH ".parse::<QualityPreset>().unwrap(), QualityPreset::High);
        assert!("ultra".parse::<QualityPreset>().is_err());
        for preset in QualityPreset::ALL {
            assert_eq!(preset.label().parse::<QualityPreset>().unwrap(), preset);
        }
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let mut settings = Settings::default();
        assert!(settings.effective_screen_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_round_trip_through_backend() {
        let mut backend = MemoryBackend::new();
        let settings = Settings {
            quality: QualityPreset::High,
            weather: false,
            ..Settings::default()
        };
        settings.save(&mut backend).unwrap();
        assert_eq!(Settings::load(&backend), settings);
    }

    #[test]
    fn test_corrupt_or_partial_settings() {
        let mut backend = MemoryBackend::new();
        backend.write(Settings::STORAGE_KEY, "{oops").unwrap();
        assert_eq!(Settings::load(&backend), Settings::default());

        backend
            .write(Settings::STORAGE_KEY, r#"{"quality":"low"}"#)
            .unwrap();
        let loaded = Settings::load(&backend);
        assert_eq!(loaded.quality, QualityPreset::Low);
        assert!(loaded.particles);
    }
}
