//! Application state

use std::path::PathBuf;
use std::sync::Arc;

use dt_core::reminder::BroadcastNotifier;
use dt_core::task::{FilePersistence, TaskStore};
use dt_core::tracker::TaskTracker;
use tokio_util::sync::CancellationToken;

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    tracker: TaskTracker,
    notifier: Arc<BroadcastNotifier>,
    data_dir: PathBuf,
    shutdown: CancellationToken,
}

impl AppState {
    /// Load tasks from the configured data directory
    pub async fn new(config: &Config, shutdown: CancellationToken) -> Self {
        let store = TaskStore::open(Arc::new(FilePersistence::new(&config.data_dir))).await;
        let notifier = Arc::new(BroadcastNotifier::new(config.permission));
        let tracker = TaskTracker::new(store, notifier.clone())
            .with_locale(config.locale)
            .with_reminder_config(config.reminders);
        Self::from_parts(tracker, notifier, config.data_dir.clone(), shutdown)
    }

    pub fn from_parts(
        tracker: TaskTracker,
        notifier: Arc<BroadcastNotifier>,
        data_dir: PathBuf,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                tracker,
                notifier,
                data_dir,
                shutdown,
            }),
        }
    }

    pub fn tracker(&self) -> &TaskTracker {
        &self.inner.tracker
    }

    pub fn notifier(&self) -> &BroadcastNotifier {
        &self.inner.notifier
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.inner.data_dir
    }

    /// Fires when the server begins shutting down
    pub fn shutdown(&self) -> &CancellationToken {
        &self.inner.shutdown
    }
}
