//! File-based task persistence
//!
//! Stores the task collection as JSON in `<data_dir>/<key>.json`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::model::Task;
use super::persistence::{TaskPersistence, TASKS_KEY};
use crate::{Error, Result};

/// File-based task persistence using JSON
pub struct FilePersistence {
    /// Path to the JSON file
    path: PathBuf,
}

impl FilePersistence {
    /// Persist under the default key inside `data_dir`
    ///
    /// The file is created on first save.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self::with_key(data_dir, TASKS_KEY)
    }

    pub fn with_key(data_dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TaskPersistence for FilePersistence {
    async fn load(&self) -> Vec<Task> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => super::decode(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Failed to read {:?}, starting empty: {}", self.path, e);
                Vec::new()
            }
        }
    }

    async fn save(&self, tasks: &[Task]) -> Result<()> {
        let content = serde_json::to_string_pretty(tasks)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::Storage(format!("Failed to create directory: {}", e))
            })?;
        }

        tokio::fs::write(&self.path, content).await.map_err(|e| {
            Error::Storage(format!("Failed to write tasks file: {}", e))
        })?;
        Ok(())
    }
}
