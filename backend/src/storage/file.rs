//! File-backed store: one JSON document per key
//!
//! Writes go to a temporary sibling file that is then renamed over the
//! target, so readers never observe a half-written document.

use async_trait::async_trait;
use meal_planner_shared::StorageError;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::KeyValueStore;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys are restricted to a safe file-name alphabet
    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

fn unavailable(context: &str, err: std::io::Error) -> StorageError {
    StorageError::Unavailable(format!("{context}: {err}"))
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        match fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(unavailable("read failed", e)),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| unavailable("cannot create storage directory", e))?;

        let target = self.path_for(key);
        let temp = target.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(&value)?;

        fs::write(&temp, bytes)
            .await
            .map_err(|e| unavailable("write failed", e))?;
        fs::rename(&temp, &target)
            .await
            .map_err(|e| unavailable("rename failed", e))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| unavailable("storage directory unavailable", e))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
