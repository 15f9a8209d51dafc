//! wasm-bindgen surface for the browser

use glam::{Vec2, Vec3};
use wasm_bindgen::prelude::*;

use crate::game::Game;
use crate::persistence::{LocalStorageBackend, MemoryBackend, SaveBackend, SaveManager};
use crate::settings::Settings;
use crate::sim::{TickInput, terrain};

/// Storage that falls back to memory when LocalStorage is blocked
enum BrowserStorage {
    Local(LocalStorageBackend),
    Memory(MemoryBackend),
}

impl BrowserStorage {
    fn open() -> Self {
        match LocalStorageBackend::new() {
            Ok(local) => BrowserStorage::Local(local),
            Err(e) => {
                log::warn!("{e}; progress will not be kept");
                BrowserStorage::Memory(MemoryBackend::new())
            }
        }
    }
}

impl SaveBackend for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<String>, crate::persistence::PersistenceError> {
        match self {
            BrowserStorage::Local(b) => b.read(key),
            BrowserStorage::Memory(b) => b.read(key),
        }
    }

    fn write(&mut self, key: &str, data: &str) -> Result<(), crate::persistence::PersistenceError> {
        match self {
            BrowserStorage::Local(b) => b.write(key, data),
            BrowserStorage::Memory(b) => b.write(key, data),
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    log::info!("Heartshot starting...");
}

/// Game handle owned by JavaScript
#[wasm_bindgen]
pub struct WebGame {
    game: Game<SaveManager<BrowserStorage>>,
    move_target: Option<Vec3>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<WebGame, JsValue> {
        let settings = Settings::load(&BrowserStorage::open());
        let persistence = SaveManager::load(BrowserStorage::open());
        let game = Game::new(seed, settings, persistence)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WebGame {
            game,
            move_target: None,
        })
    }

    /// False if the level is unknown or malformed (the current one keeps running)
    pub fn load_level(&mut self, level_id: u32) -> bool {
        self.move_target = None;
        self.game.load_level(level_id).is_ok()
    }

    /// Advance one frame; returns the frame's events as JSON
    pub fn frame(&mut self, dt: f32, move_x: f32, move_y: f32, fire: bool, pause: bool) -> String {
        let input = TickInput {
            move_dir: Vec2::new(move_x, move_y),
            move_target: self.move_target.take(),
            fire,
            pause,
            autopilot: false,
        };
        let events = self.game.frame(&input, dt);
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("could not encode events: {e}");
            "[]".to_string()
        })
    }

    /// Walk to a ground point (pointer navigation)
    pub fn set_move_target(&mut self, x: f32, z: f32) {
        self.move_target = Some(terrain::ground_point(x, z));
    }

    pub fn clear_move_target(&mut self) {
        self.move_target = None;
        self.game.clear_move_target();
    }

    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.game.snapshot()).unwrap_or_else(|e| {
            log::warn!("could not encode snapshot: {e}");
            "{}".to_string()
        })
    }

    pub fn is_level_unlocked(&self, level_id: u32) -> bool {
        self.game.is_level_unlocked(level_id)
    }

    pub fn stars(&self, level_id: u32) -> u8 {
        self.game.stars(level_id)
    }
}
