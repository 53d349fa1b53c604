//! Task model definitions

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

/// Where a task sits relative to its reminder window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderState {
    NotDue,
    DueSoon,
    Notified,
}

/// A task in the tracker
///
/// Field names on disk follow the browser tracker's localStorage layout, so
/// collections saved by it load unchanged. Records without an `id` load with
/// the nil id; `TaskStore::open` assigns real ids and saves them once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(rename = "dueDateTime")]
    pub due_at: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notified: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new open task due at `due_at`
    pub fn new(text: impl Into<String>, due_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            priority: TaskPriority::default(),
            due_at,
            completed: false,
            notified: false,
            created_at: Utc::now(),
        }
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Past due and still open
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_at < now && !self.completed
    }

    pub fn reminder_state(&self, now: DateTime<Utc>, window: Duration) -> ReminderState {
        if self.notified {
            return ReminderState::Notified;
        }
        if self.completed {
            return ReminderState::NotDue;
        }
        let diff = self.due_at - now;
        if diff > Duration::zero() && diff < window {
            ReminderState::DueSoon
        } else {
            ReminderState::NotDue
        }
    }
}

/// Input for adding a task to the store
#[derive(Debug, Clone)]
pub struct NewTask {
    pub text: String,
    pub priority: TaskPriority,
    pub due_at: DateTime<Utc>,
}

impl NewTask {
    pub fn new(text: impl Into<String>, due_at: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            priority: TaskPriority::default(),
            due_at,
        }
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub(crate) fn into_task(self) -> Task {
        Task::new(self.text, self.due_at).with_priority(self.priority)
    }
}
