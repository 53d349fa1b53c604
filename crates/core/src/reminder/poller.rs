//! Reminder poller
//!
//! Each task moves `NotDue -> DueSoon -> Notified` at most once. A task whose
//! due time passes while no tick lands inside its window is never reminded.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::notifier::{Notification, NotificationPermission, Notifier};
use crate::clock::Clock;
use crate::locale::Locale;
use crate::task::{ReminderState, TaskStore};
use crate::Result;

pub const DEFAULT_REMINDER_WINDOW_SECS: i64 = 5 * 60;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, Copy)]
pub struct ReminderConfig {
    /// Lookahead before the due time in which a reminder fires
    pub window: Duration,
    pub interval: std::time::Duration,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            window: Duration::seconds(DEFAULT_REMINDER_WINDOW_SECS),
            interval: std::time::Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}

pub struct ReminderPoller {
    store: TaskStore,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    locale: Locale,
    config: ReminderConfig,
}

impl ReminderPoller {
    pub fn new(
        store: TaskStore,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        locale: Locale,
        config: ReminderConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
            locale,
            config,
        }
    }

    /// Scan once at the clock's current time
    pub async fn tick(&self) -> Result<Vec<Notification>> {
        self.tick_at(self.clock.now()).await
    }

    /// Scan once at `now`, returning the reminders that fired
    ///
    /// A task whose flag cannot be saved is skipped and stays due for the
    /// next tick; the rest of the scan still runs and the first such error is
    /// returned at the end.
    pub async fn tick_at(&self, now: DateTime<Utc>) -> Result<Vec<Notification>> {
        let permitted = self.notifier.permission() == NotificationPermission::Granted;
        let mut fired = Vec::new();
        let mut first_error = None;

        for candidate in self.store.list().await {
            if candidate.reminder_state(now, self.config.window) != ReminderState::DueSoon {
                continue;
            }
            // Only the call that flips the flag gets to notify
            let task = match self
                .store
                .mark_notified(candidate.id, now, self.config.window)
                .await
            {
                Ok(Some(task)) => task,
                Ok(None) => continue,
                Err(e) => {
                    warn!(task_id = %candidate.id, "Failed to record reminder: {}", e);
                    first_error.get_or_insert(e);
                    continue;
                }
            };

            let minutes = (task.due_at - now).num_minutes();
            let notification = Notification {
                task_id: task.id,
                title: self.locale.reminder_title().to_string(),
                body: self.locale.reminder_body(&task.text, minutes),
                due_at: task.due_at,
                fired_at: now,
            };

            if permitted {
                info!(task_id = %task.id, "Reminder fired");
                self.notifier.show(notification.clone());
            } else {
                warn!(task_id = %task.id, "Reminder suppressed, notifications not permitted");
            }
            fired.push(notification);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(fired),
        }
    }

    /// Tick on the configured interval until `cancel` fires
    pub async fn run(self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.interval);
        info!(
            "Reminder poller started (window {}s, interval {:?})",
            self.config.window.num_seconds(),
            self.config.interval
        );
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    if let Err(e) = self.tick().await {
                        warn!("Reminder tick failed: {}", e);
                    }
                }
            }
        }
        info!("Reminder poller stopped");
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}
