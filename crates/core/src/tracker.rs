//! The task tracker application object
//!
//! Every user action goes through here: validate, mutate the store, and
//! leave rendering to the caller via [`TaskTracker::view`].

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::export::{self, Export};
use crate::locale::Locale;
use crate::reminder::{NotificationPermission, Notifier, ReminderConfig, ReminderPoller};
use crate::task::{NewTask, Task, TaskPriority, TaskStore};
use crate::view::{self, Filter, TaskView};
use crate::{Error, Result};

const DEFAULT_DUE_TIME: &str = "00:00";

/// Display theme; lives only as long as the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Raw add-task input as entered by the user
#[derive(Debug, Clone, Default)]
pub struct AddTask {
    pub text: String,
    pub priority: TaskPriority,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, midnight when absent
    pub time: Option<String>,
}

impl AddTask {
    pub fn new(text: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            date: date.into(),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }
}

pub struct TaskTracker {
    store: TaskStore,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    locale: Locale,
    reminders: ReminderConfig,
    permission: NotificationPermission,
    theme: RwLock<Theme>,
}

impl TaskTracker {
    /// Build a tracker over `store`, asking `notifier` for permission once
    pub fn new(store: TaskStore, notifier: Arc<dyn Notifier>) -> Self {
        let permission = notifier.request_permission();
        info!("Notification permission: {:?}", permission);
        Self {
            store,
            notifier,
            clock: Arc::new(SystemClock),
            locale: Locale::default(),
            reminders: ReminderConfig::default(),
            permission,
            theme: RwLock::new(Theme::default()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_reminder_config(mut self, config: ReminderConfig) -> Self {
        self.reminders = config;
        self
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn notification_permission(&self) -> NotificationPermission {
        self.permission
    }

    /// Validate user input and append the task
    pub async fn add(&self, input: AddTask) -> Result<Task> {
        let text = input.text.trim();
        let date = input.date.trim();
        if text.is_empty() || date.is_empty() {
            return Err(Error::Validation(self.locale.missing_fields().to_string()));
        }

        let time = input
            .time
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_DUE_TIME);
        let due_at = parse_local_due(date, time)
            .ok_or_else(|| Error::Validation(self.locale.invalid_due().to_string()))?;

        self.store
            .add(NewTask::new(text, due_at).with_priority(input.priority))
            .await
    }

    pub async fn toggle_complete(&self, id: Uuid) -> Result<Option<Task>> {
        self.store.toggle_complete(id).await
    }

    pub async fn edit(&self, id: Uuid, new_text: Option<&str>) -> Result<Option<Task>> {
        self.store.edit(id, new_text).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<Option<Task>> {
        self.store.delete(id).await
    }

    pub async fn clear_completed(&self) -> Result<usize> {
        self.store.clear_completed().await
    }

    /// Remove every task; refused unless the user confirmed
    pub async fn clear_all(&self, confirmed: bool) -> Result<usize> {
        if !confirmed {
            return Err(Error::ConfirmationRequired(
                self.locale.confirm_clear_all().to_string(),
            ));
        }
        self.store.clear_all().await
    }

    /// Current tasks through `filter` and `search`, evaluated now
    pub async fn view(&self, filter: Filter, search: &str) -> Vec<TaskView> {
        let tasks = self.store.list().await;
        view::render(&tasks, filter, search, self.clock.now())
    }

    pub async fn export_csv(&self) -> Result<Export> {
        let tasks = self.store.list().await;
        export::to_csv(&tasks, self.locale)
    }

    pub async fn theme(&self) -> Theme {
        *self.theme.read().await
    }

    pub async fn toggle_theme(&self) -> Theme {
        let mut theme = self.theme.write().await;
        *theme = theme.toggled();
        *theme
    }

    pub fn reminder_poller(&self) -> ReminderPoller {
        ReminderPoller::new(
            self.store.clone(),
            Arc::clone(&self.notifier),
            Arc::clone(&self.clock),
            self.locale,
            self.reminders,
        )
    }

    /// Spawn the reminder poller; it runs until `cancel` fires
    pub fn start_reminders(&self, cancel: CancellationToken) -> JoinHandle<()> {
        self.reminder_poller().spawn(cancel)
    }
}

/// Interpret a local date and time, `None` when invalid or nonexistent
fn parse_local_due(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .ok()?;
    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|due| due.with_timezone(&Utc))
}
