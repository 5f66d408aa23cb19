//! Key-value persistence for settings and records
//!
//! Values are JSON strings stored under fixed keys. Backends:
//! - `MemoryStore`: in-process, for tests and headless runs
//! - `FileStore`: one JSON file per key in a directory (native)
//! - `LocalStorage`: browser LocalStorage (wasm32)

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorage;

/// Persistence failures. None of these are fatal to a match.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flat string key-value storage
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Platform default store: LocalStorage in the browser, a data directory
/// natively. Falls back to memory (nothing persists) if that fails.
pub fn open_default_store() -> Box<dyn KvStore> {
    #[cfg(target_arch = "wasm32")]
    let opened = LocalStorage::open().map(|s| Box::new(s) as Box<dyn KvStore>);
    #[cfg(not(target_arch = "wasm32"))]
    let opened = FileStore::open(DEFAULT_DATA_DIR).map(|s| Box::new(s) as Box<dyn KvStore>);

    opened.unwrap_or_else(|e| {
        log::warn!("Persistent storage unavailable, using memory: {e}");
        Box::new(MemoryStore::new())
    })
}

/// Directory used by the native default store
#[cfg(not(target_arch = "wasm32"))]
pub const DEFAULT_DATA_DIR: &str = "weapon-duel-data";

/// Read and decode a JSON value. `Ok(None)` if the key is absent.
pub fn load_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Result<Option<T>, PersistError> {
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize>(store: &mut dyn KvStore, key: &str, value: &T) -> Result<(), PersistError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}
