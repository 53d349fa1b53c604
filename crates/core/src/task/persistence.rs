//! Task persistence interface
//!
//! The whole collection lives under one key and is rewritten on every save.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::Task;
use crate::Result;

/// Key the task collection is stored under
pub const TASKS_KEY: &str = "tasks";

#[async_trait]
pub trait TaskPersistence: Send + Sync {
    /// Load the stored collection
    ///
    /// Absent or unreadable state yields an empty collection.
    async fn load(&self) -> Vec<Task>;

    /// Replace the stored collection
    async fn save(&self, tasks: &[Task]) -> Result<()>;
}

/// Keeps the serialized collection in memory
#[derive(Default)]
pub struct MemoryPersistence {
    slot: RwLock<Option<String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw stored text, as if written by an earlier session
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(raw.into())),
        }
    }

    pub async fn raw(&self) -> Option<String> {
        self.slot.read().await.clone()
    }
}

#[async_trait]
impl TaskPersistence for MemoryPersistence {
    async fn load(&self) -> Vec<Task> {
        let slot = self.slot.read().await;
        match slot.as_deref() {
            Some(raw) => super::decode(raw),
            None => Vec::new(),
        }
    }

    async fn save(&self, tasks: &[Task]) -> Result<()> {
        let content = serde_json::to_string(tasks)?;
        *self.slot.write().await = Some(content);
        Ok(())
    }
}

/// Memory persistence whose next `failures` saves return a storage error
#[cfg(test)]
#[derive(Default)]
pub(crate) struct FailingPersistence {
    inner: MemoryPersistence,
    failures: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl FailingPersistence {
    pub(crate) fn fail_next(&self, count: usize) {
        self.failures
            .store(count, std::sync::atomic::Ordering::SeqCst);
    }

    pub(crate) async fn raw(&self) -> Option<String> {
        self.inner.raw().await
    }
}

#[cfg(test)]
#[async_trait]
impl TaskPersistence for FailingPersistence {
    async fn load(&self) -> Vec<Task> {
        self.inner.load().await
    }

    async fn save(&self, tasks: &[Task]) -> Result<()> {
        use std::sync::atomic::Ordering;
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(crate::Error::Storage("disk unavailable".to_string()));
        }
        self.inner.save(tasks).await
    }
}
