//! Notification sinks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Answer to the one-time notification permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    #[default]
    Default,
    Granted,
    Denied,
}

impl FromStr for NotificationPermission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "granted" | "1" | "true" | "yes" | "on" => Ok(Self::Granted),
            "denied" | "0" | "false" | "no" | "off" => Ok(Self::Denied),
            other => Err(format!("unknown notification permission: {}", other)),
        }
    }
}

/// A reminder ready to be shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub task_id: Uuid,
    pub title: String,
    pub body: String,
    pub due_at: DateTime<Utc>,
    pub fired_at: DateTime<Utc>,
}

pub trait Notifier: Send + Sync {
    /// Ask for permission to show notifications
    fn request_permission(&self) -> NotificationPermission;

    /// Current permission; only `Granted` lets notifications through
    fn permission(&self) -> NotificationPermission;

    /// Show a notification, fire-and-forget
    fn show(&self, notification: Notification);
}

/// Fans notifications out to every live subscriber
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Notification>,
    permission: NotificationPermission,
}

impl BroadcastNotifier {
    pub fn new(permission: NotificationPermission) -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx, permission }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl Notifier for BroadcastNotifier {
    fn request_permission(&self) -> NotificationPermission {
        self.permission
    }

    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn show(&self, notification: Notification) {
        // No subscribers is fine
        let _ = self.tx.send(notification);
    }
}
