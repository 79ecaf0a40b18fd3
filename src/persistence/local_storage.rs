//! Browser LocalStorage backend

use super::{ScoreBackend, StorageError, parse_score};

/// Key shared with earlier releases so existing high scores carry over
pub const STORAGE_KEY: &str = "carRacingHighScore";

#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(STORAGE_KEY)
    }
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)
    }
}

impl ScoreBackend for LocalStorageStore {
    fn read(&self) -> Result<Option<u64>, StorageError> {
        let raw = Self::storage()?
            .get_item(&self.key)
            .map_err(|_| StorageError::Unavailable)?;
        raw.as_deref().map(parse_score).transpose()
    }

    fn write(&mut self, score: u64) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(&self.key, &score.to_string())
            .map_err(|e| StorageError::Rejected(format!("{e:?}")))
    }
}
