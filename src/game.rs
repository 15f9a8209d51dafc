//! Session facade
//!
//! Owns the level catalog, the simulation, player settings and progress
//! storage. Hosts (browser bindings, native runner) drive everything
//! through this type.

use crate::persistence::Persistence;
use crate::settings::Settings;
use crate::sim::{
    GameEvent, GameState, LevelCatalog, LevelError, ParticlePool, Snapshot, TickInput, tick,
};

pub struct Game<P: Persistence> {
    catalog: LevelCatalog,
    state: GameState,
    settings: Settings,
    persistence: P,
    /// Events raised outside a frame, delivered with the next one
    pending: Vec<GameEvent>,
}

impl<P: Persistence> Game<P> {
    /// A game over the built-in levels
    pub fn new(seed: u64, settings: Settings, persistence: P) -> Result<Self, LevelError> {
        Ok(Self::with_catalog(
            LevelCatalog::builtin()?,
            seed,
            settings,
            persistence,
        ))
    }

    pub fn with_catalog(
        catalog: LevelCatalog,
        seed: u64,
        settings: Settings,
        persistence: P,
    ) -> Self {
        let state = GameState::new(seed, settings.max_particles());
        let mut game = Self {
            catalog,
            state,
            settings: Settings::default(),
            persistence,
            pending: Vec::new(),
        };
        game.apply_settings(settings);
        game
    }

    /// Start a level from scratch
    ///
    /// On failure the current session keeps running untouched.
    pub fn load_level(&mut self, level_id: u32) -> Result<(), LevelError> {
        let result = self
            .catalog
            .get(level_id)
            .and_then(|level| self.state.load_level(level));
        match result {
            Ok(()) => {
                self.pending.push(GameEvent::LevelLoaded { level_id });
                Ok(())
            }
            Err(e) => {
                log::warn!("level {level_id} not loaded: {e}");
                Err(e)
            }
        }
    }

    /// Advance one rendered frame
    pub fn frame(&mut self, input: &TickInput, raw_dt: f32) -> Vec<GameEvent> {
        let mut events = std::mem::take(&mut self.pending);
        events.extend(tick(&mut self.state, input, raw_dt));

        for event in &events {
            if let GameEvent::LevelComplete(completion) = event {
                self.persistence.record_completion(*completion);
            }
        }
        events
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Drop any pointer navigation target
    pub fn clear_move_target(&mut self) {
        self.state.player.clear_move_target();
    }

    /// Push settings into the running simulation
    ///
    /// A different particle budget rebuilds the pool, dropping live particles.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.state.time.shake_enabled = settings.effective_screen_shake();
        self.state.day_night.enabled = settings.day_night_cycle;
        self.state.weather.enabled = settings.weather;

        let capacity = settings.max_particles();
        if self.state.particles.capacity() != capacity {
            self.state.particles = ParticlePool::with_capacity(capacity);
        }
        self.settings = settings;
    }

    pub fn is_level_unlocked(&self, level_id: u32) -> bool {
        self.catalog.get(level_id).is_ok() && self.persistence.is_level_unlocked(level_id)
    }

    pub fn stars(&self, level_id: u32) -> u8 {
        self.persistence.stars(level_id)
    }

    pub fn is_paused(&self) -> bool {
        self.state.session.is_paused
    }

    pub fn is_complete(&self) -> bool {
        self.state.session.is_complete
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::persistence::{MemoryBackend, SaveManager};
    use crate::settings::QualityPreset;
    use crate::sim::{AnimalKind, LevelConfig, Theme};
    use crate::sim::level::AnimalSpawn;

    const DT: f32 = 1.0 / 60.0;

    fn level(id: u32, animal_x: &[f32]) -> LevelConfig {
        LevelConfig {
            id,
            name: format!("Field {id}"),
            theme: Theme::Meadow,
            par_time: 120.0,
            player_start: Vec3::ZERO,
            animals: animal_x
                .iter()
                .map(|&x| AnimalSpawn {
                    kind: AnimalKind::Normal,
                    position: Vec3::new(x, 0.0, 10.0),
                })
                .collect(),
            obstacles: Vec::new(),
            hazards: Some(0),
        }
    }

    fn game() -> Game<SaveManager<MemoryBackend>> {
        let mut broken = level(3, &[0.0]);
        broken.player_start = Vec3::new(100.0, 0.0, 0.0);
        let catalog =
            LevelCatalog::from_levels(vec![level(1, &[-15.0, 0.0, 15.0]), level(2, &[5.0]), broken]);
        Game::with_catalog(
            catalog,
            1234,
            Settings::from_preset(QualityPreset::High),
            SaveManager::load(MemoryBackend::new()),
        )
    }

    #[test]
    fn test_builtin_game() {
        let mut game = Game::new(1, Settings::default(), SaveManager::load(MemoryBackend::new()))
            .unwrap();
        assert_eq!(game.catalog().len(), 9);
        game.load_level(1).unwrap();
        assert!(game.state().has_level());
        assert_eq!(game.snapshot().theme, Theme::Meadow);
    }

    #[test]
    fn test_load_event_arrives_with_next_frame() {
        let mut game = game();
        game.load_level(1).unwrap();
        let events = game.frame(&TickInput::default(), DT);
        assert_eq!(events.first(), Some(&GameEvent::LevelLoaded { level_id: 1 }));
        let events = game.frame(&TickInput::default(), DT);
        assert!(!events.contains(&GameEvent::LevelLoaded { level_id: 1 }));
    }

    #[test]
    fn test_failed_load_keeps_session() {
        let mut game = game();
        game.load_level(1).unwrap();
        game.frame(&TickInput::default(), DT);
        let elapsed = game.state().session.elapsed;

        assert!(matches!(game.load_level(42), Err(LevelError::UnknownLevel(42))));
        assert!(matches!(
            game.load_level(3),
            Err(LevelError::InvalidPosition { level: 3, .. })
        ));
        assert_eq!(game.state().session.level_id, 1);
        assert_eq!(game.state().session.elapsed, elapsed);
        assert_eq!(game.state().animals.len(), 3);
    }

    #[test]
    fn test_completion_reaches_persistence() {
        let mut game = game();
        assert!(game.is_level_unlocked(1));
        assert!(!game.is_level_unlocked(2));

        game.load_level(1).unwrap();
        let auto = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..(60 * 120) {
            game.frame(&auto, DT);
            if game.is_complete() {
                break;
            }
        }
        assert!(game.is_complete());
        assert!(game.stars(1) >= 1);
        assert!(game.is_level_unlocked(2));
        assert!(!game.is_level_unlocked(4));
        assert_eq!(game.persistence().data().levels_completed, vec![1]);
    }

    #[test]
    fn test_pause_toggles() {
        let mut game = game();
        game.load_level(1).unwrap();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        let events = game.frame(&pause, DT);
        assert!(events.contains(&GameEvent::Paused));
        assert!(game.is_paused());
        let before = game.state().session.elapsed;
        game.frame(&TickInput::default(), DT);
        assert_eq!(game.state().session.elapsed, before);
        game.frame(&pause, DT);
        assert!(!game.is_paused());
    }

    #[test]
    fn test_apply_settings() {
        let mut game = game();
        assert_eq!(game.state().particles.capacity(), 2000);
        game.apply_settings(Settings {
            quality: QualityPreset::Low,
            reduced_motion: true,
            weather: false,
            day_night_cycle: false,
            ..Settings::default()
        });
        assert_eq!(game.state().particles.capacity(), 300);
        assert!(!game.state().time.shake_enabled);
        assert!(!game.state().weather.enabled);
        assert!(!game.state().day_night.enabled);
        assert_eq!(game.settings().quality, QualityPreset::Low);

        // Level loads keep the toggles
        game.load_level(1).unwrap();
        assert!(!game.state().weather.enabled);
        assert!(!game.state().day_night.enabled);
    }

    #[test]
    fn test_clear_move_target() {
        let mut game = game();
        game.load_level(1).unwrap();
        game.state_mut().player.set_move_target(Vec3::new(5.0, 0.0, 5.0));
        game.clear_move_target();
        assert!(game.state().player.move_target.is_none());
    }
}
