//! JSON file backend for native builds

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ScoreBackend, StorageError};

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    high_score: u64,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreBackend for FileStore {
    fn read(&self) -> Result<Option<u64>, StorageError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: Record =
            serde_json::from_str(&json).map_err(|e| StorageError::Malformed(e.to_string()))?;
        Ok(Some(record.high_score))
    }

    /// Write to a sibling temp file, then rename over the record
    fn write(&mut self, score: u64) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&Record { high_score: score })
            .map_err(|e| StorageError::Rejected(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
