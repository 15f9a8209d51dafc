//! Player progress: cleared levels, stars, achievements and totals

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Persistence, PersistenceError, SaveBackend};
use crate::sim::LevelCompletion;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

/// Storage key for the save document
pub const SAVE_KEY: &str = "heartshot_save";

/// Levels that count toward the campaign achievements
const CAMPAIGN_LEVELS: [u32; 3] = [1, 2, 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Achievement {
    FirstUnicorn,
    HundredUnicorns,
    AllLevels,
    Completionist,
}

impl Achievement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Achievement::FirstUnicorn => "first_unicorn",
            Achievement::HundredUnicorns => "hundred_unicorns",
            Achievement::AllLevels => "all_levels",
            Achievement::Completionist => "completionist",
        }
    }
}

/// Lifetime totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayStats {
    pub total_animals_transformed: u64,
    pub total_projectiles_fired: u64,
    /// Seconds spent in cleared levels
    pub total_play_time: f64,
}

/// Everything written to storage
///
/// Missing fields load as defaults, so older saves still parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveData {
    /// Absent in pre-versioned saves
    #[serde(default)]
    pub version: u32,
    pub levels_completed: Vec<u32>,
    pub level_stars: BTreeMap<u32, u8>,
    /// Fastest clear per level (seconds)
    pub best_times: BTreeMap<u32, f32>,
    /// Stored as strings so unknown entries from newer builds survive
    pub achievements: Vec<String>,
    pub stats: PlayStats,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            levels_completed: Vec::new(),
            level_stars: BTreeMap::new(),
            best_times: BTreeMap::new(),
            achievements: Vec::new(),
            stats: PlayStats::default(),
        }
    }
}

impl SaveData {
    /// Parse a stored document, upgrading older versions
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let mut data: SaveData = serde_json::from_str(json)?;
        if data.version != SAVE_VERSION {
            log::info!("migrating save from version {} to {}", data.version, SAVE_VERSION);
            data.version = SAVE_VERSION;
        }
        Ok(data)
    }

    pub fn has_achievement(&self, achievement: Achievement) -> bool {
        self.achievements.iter().any(|a| a == achievement.as_str())
    }

    fn grant(&mut self, achievement: Achievement) {
        if !self.has_achievement(achievement) {
            log::info!("achievement unlocked: {}", achievement.as_str());
            self.achievements.push(achievement.as_str().to_string());
        }
    }

    fn stars(&self, level_id: u32) -> u8 {
        self.level_stars.get(&level_id).copied().unwrap_or(0)
    }
}

/// Save data held in memory and mirrored to a backend
pub struct SaveManager<B: SaveBackend> {
    backend: B,
    data: SaveData,
}

impl<B: SaveBackend> SaveManager<B> {
    /// Load from the backend, falling back to a fresh save on any error
    pub fn load(backend: B) -> Self {
        let data = match backend.read(SAVE_KEY) {
            Ok(Some(json)) => SaveData::from_json(&json).unwrap_or_else(|e| {
                log::warn!("save data unreadable, starting fresh: {e}");
                SaveData::default()
            }),
            Ok(None) => SaveData::default(),
            Err(e) => {
                log::warn!("could not read save data, starting fresh: {e}");
                SaveData::default()
            }
        };
        Self { backend, data }
    }

    pub fn data(&self) -> &SaveData {
        &self.data
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn save(&mut self) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(&self.data)?;
        self.backend.write(SAVE_KEY, &json)?;
        log::debug!("save written ({} bytes)", json.len());
        Ok(())
    }

    /// Wipe all progress
    pub fn reset(&mut self) {
        self.data = SaveData::default();
        self.save_or_log();
    }

    fn save_or_log(&mut self) {
        if let Err(e) = self.save() {
            log::warn!("failed to write save data: {e}");
        }
    }

    fn check_achievements(&mut self, animals_transformed: u32) {
        if animals_transformed >= 1 {
            self.data.grant(Achievement::FirstUnicorn);
        }
        if self.data.stats.total_animals_transformed >= 100 {
            self.data.grant(Achievement::HundredUnicorns);
        }
        if CAMPAIGN_LEVELS
            .iter()
            .all(|id| self.data.levels_completed.contains(id))
        {
            self.data.grant(Achievement::AllLevels);
        }
        if CAMPAIGN_LEVELS.iter().all(|&id| self.data.stars(id) == 3) {
            self.data.grant(Achievement::Completionist);
        }
    }
}

impl<B: SaveBackend> Persistence for SaveManager<B> {
    fn record_completion(&mut self, completion: LevelCompletion) {
        let data = &mut self.data;
        if !data.levels_completed.contains(&completion.level_id) {
            data.levels_completed.push(completion.level_id);
        }

        let stars = data.level_stars.entry(completion.level_id).or_insert(0);
        *stars = (*stars).max(completion.stars);

        let best = data
            .best_times
            .entry(completion.level_id)
            .or_insert(completion.time);
        *best = best.min(completion.time);

        data.stats.total_animals_transformed += u64::from(completion.animals_transformed);
        data.stats.total_projectiles_fired += u64::from(completion.projectiles_fired);
        data.stats.total_play_time += f64::from(completion.time);

        self.check_achievements(completion.animals_transformed);
        self.save_or_log();
    }

    fn is_level_unlocked(&self, level_id: u32) -> bool {
        level_id == 1 || self.data.levels_completed.contains(&(level_id.saturating_sub(1)))
    }

    fn stars(&self, level_id: u32) -> u8 {
        self.data.stars(level_id)
    }
}
