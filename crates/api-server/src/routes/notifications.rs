//! Reminder notifications
//!
//! Reminders are pushed to clients as server-sent events.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use dt_core::reminder::{Notification, NotificationPermission};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub permission: NotificationPermission,
}

/// GET /api/notifications/permission
async fn get_permission(State(state): State<AppState>) -> Json<PermissionResponse> {
    Json(PermissionResponse {
        permission: state.tracker().notification_permission(),
    })
}

/// GET /api/notifications - Stream reminders as they fire
async fn stream_notifications(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.notifier().subscribe();
    let shutdown = state.shutdown().clone();

    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(notification) => match reminder_event(&notification) {
                    Some(event) => return Some((Ok::<_, Infallible>(event), rx)),
                    None => continue,
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Notification stream lagged, skipped {} reminders", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
    .take_until(shutdown.cancelled_owned());

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn reminder_event(notification: &Notification) -> Option<Event> {
    match Event::default().event("reminder").json_data(notification) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!("Failed to encode reminder: {}", e);
            None
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/notifications", get(stream_notifications))
        .route("/api/notifications/permission", get(get_permission))
}
