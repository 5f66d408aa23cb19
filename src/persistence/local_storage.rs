//! Browser LocalStorage backend (wasm32 only)

use super::{KvStore, PersistError};

/// Handle to `window.localStorage`
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self, PersistError> {
        let storage = web_sys::window()
            .ok_or_else(|| PersistError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| PersistError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| PersistError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

impl KvStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        self.storage
            .get_item(key)
            .map_err(|e| PersistError::Unavailable(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| PersistError::Unavailable(format!("{e:?}")))
    }
}
