//! High score persistence
//!
//! Backends report typed `StorageError`s; the `HighScoreStore` boundary turns
//! them into a warning plus a safe default so the frame never sees a failure.

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("storage i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed stored record: {0}")]
    Malformed(String),
    #[error("storage rejected write: {0}")]
    Rejected(String),
}

/// Raw backend operations
pub trait ScoreBackend {
    /// `Ok(None)` when nothing has been stored yet
    fn read(&self) -> Result<Option<u64>, StorageError>;
    fn write(&mut self, score: u64) -> Result<(), StorageError>;
}

/// Persistence collaborator: infallible from the caller's point of view
pub trait HighScoreStore {
    /// Stored high score, 0 on absence or failure
    fn load_high_score(&self) -> u64;
    /// Persist; failures are logged and dropped
    fn save_high_score(&mut self, score: u64);
}

impl<B: ScoreBackend> HighScoreStore for B {
    fn load_high_score(&self) -> u64 {
        match self.read() {
            Ok(score) => score.unwrap_or(0),
            Err(e) => {
                log::warn!("Could not load high score: {e}");
                0
            }
        }
    }

    fn save_high_score(&mut self, score: u64) {
        match self.write(score) {
            Ok(()) => log::info!("High score saved: {score}"),
            Err(e) => log::warn!("Could not save high score: {e}"),
        }
    }
}

/// Parse a stored value, tolerating surrounding whitespace
pub fn parse_score(raw: &str) -> Result<u64, StorageError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| StorageError::Malformed(format!("{raw:?}: {e}")))
}

/// In-memory store for tests and the headless build
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub score: Option<u64>,
    /// Number of successful writes
    pub writes: usize,
    /// Simulate a broken backend
    pub fail: bool,
}

impl MemoryStore {
    pub fn with_score(score: u64) -> Self {
        Self {
            score: Some(score),
            ..Self::default()
        }
    }
}

impl ScoreBackend for MemoryStore {
    fn read(&self) -> Result<Option<u64>, StorageError> {
        if self.fail {
            return Err(StorageError::Unavailable);
        }
        Ok(self.score)
    }

    fn write(&mut self, score: u64) -> Result<(), StorageError> {
        if self.fail {
            return Err(StorageError::Unavailable);
        }
        self.score = Some(score);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_score_defaults_to_zero() {
        let store = MemoryStore::default();
        assert_eq!(store.load_high_score(), 0);
    }

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::default();
        store.save_high_score(4200);
        assert_eq!(store.load_high_score(), 4200);
        assert_eq!(store.writes, 1);
    }

    #[test]
    fn test_failures_degrade_silently() {
        let mut store = MemoryStore {
            fail: true,
            ..MemoryStore::with_score(99)
        };
        assert_eq!(store.load_high_score(), 0);
        store.save_high_score(500);
        assert_eq!(store.writes, 0);
        assert_eq!(store.score, Some(99));
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score(" 1450\n").unwrap(), 1450);
        assert!(matches!(parse_score("abc"), Err(StorageError::Malformed(_))));
        assert!(matches!(parse_score("-5"), Err(StorageError::Malformed(_))));
    }
}
