//! Task module
//!
//! This module contains task-related types, persistence and the task store.

mod file_store;
mod model;
mod persistence;
mod store;

pub use file_store::FilePersistence;
pub use model::*;
pub use persistence::{MemoryPersistence, TaskPersistence, TASKS_KEY};
pub use store::TaskStore;

#[cfg(test)]
pub(crate) use persistence::FailingPersistence;

/// Parse a stored collection, treating malformed content as empty
fn decode(raw: &str) -> Vec<Task> {
    match serde_json::from_str::<Vec<Task>>(raw) {
        Ok(tasks) => tasks,
        Err(e) => {
            tracing::warn!("Stored tasks are malformed, starting empty: {}", e);
            Vec::new()
        }
    }
}
