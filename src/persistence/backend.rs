//! Key/value storage backends
//!
//! Each key holds one JSON document.

use std::collections::HashMap;

use super::PersistenceError;

/// String storage addressed by key
pub trait SaveBackend {
    /// `Ok(None)` when nothing has been stored under `key` yet
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn write(&mut self, key: &str, data: &str) -> Result<(), PersistenceError>;
}

/// In-process storage (tests, and a fallback when nothing else works)
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored document, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl SaveBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, data: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), data.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileBackend {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> std::path::PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SaveBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a temp file, then rename over the old one
    fn write(&mut self, key: &str, data: &str) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageBackend {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageBackend {
    pub fn new() -> Result<Self, PersistenceError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistenceError::Unavailable("no LocalStorage".to_string()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl SaveBackend for LocalStorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.storage
            .get_item(key)
            .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))
    }

    fn write(&mut self, key: &str, data: &str) -> Result<(), PersistenceError> {
        self.storage
            .set_item(key, data)
            .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))
    }
}
