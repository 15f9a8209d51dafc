//! Save data persistence
//!
//! Features:
//! - Versioned JSON save data with migration
//! - Pluggable storage backends (memory, file, LocalStorage)
//! - Best-effort writes: storage failures never stop play

pub mod backend;
pub mod save;

use thiserror::Error;

use crate::sim::LevelCompletion;

pub use backend::{MemoryBackend, SaveBackend};
#[cfg(not(target_arch = "wasm32"))]
pub use backend::FileBackend;
#[cfg(target_arch = "wasm32")]
pub use backend::LocalStorageBackend;
pub use save::{Achievement, PlayStats, SaveData, SaveManager};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save data could not be encoded: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// What the game needs from progress storage
pub trait Persistence {
    /// A level was cleared
    fn record_completion(&mut self, completion: LevelCompletion);

    /// Level 1 is always open; later levels open once the previous one is cleared
    fn is_level_unlocked(&self, level_id: u32) -> bool;

    /// Best star rating for a level (0 if never cleared)
    fn stars(&self, level_id: u32) -> u8;
}
