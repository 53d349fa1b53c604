//! Task API endpoints
//!
//! The command surface over HTTP: add, list with filter/search, toggle,
//! edit, delete and the two bulk clears.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dt_core::export::format_due;
use dt_core::task::{Task, TaskPriority};
use dt_core::tracker::AddTask;
use dt_core::view::{Filter, TaskView};

use super::{api_error, core_error, ApiError};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub text: String,
    /// Parsed in the handler so an unknown value gets the JSON error shape
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    /// Absent means the edit was cancelled
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClearAllQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// One entry of the rendered task list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEntry {
    pub id: Uuid,
    pub text: String,
    pub priority: TaskPriority,
    pub due_at: String,
    pub due_display: String,
    pub completed: bool,
    pub overdue: bool,
    pub notified: bool,
    pub classes: String,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub removed: usize,
}

impl From<TaskView> for TaskEntry {
    fn from(view: TaskView) -> Self {
        let classes = view.classes();
        let task = view.task;
        Self {
            id: task.id,
            due_display: format_due(&task),
            due_at: task.due_at.to_rfc3339(),
            text: task.text,
            priority: task.priority,
            completed: task.completed,
            overdue: view.is_overdue,
            notified: task.notified,
            classes,
        }
    }
}

fn entry(task: Task, now: DateTime<Utc>) -> TaskEntry {
    let is_overdue = task.is_overdue(now);
    TaskEntry::from(TaskView { task, is_overdue })
}

fn not_found(id: Uuid) -> ApiError {
    api_error(StatusCode::NOT_FOUND, format!("Task {} not found", id))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/tasks - List tasks through a filter and search term
async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TaskEntry>>, ApiError> {
    let filter: Filter = query
        .filter
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|e: String| api_error(StatusCode::BAD_REQUEST, e))?;
    let search = query.search.unwrap_or_default();

    let views = state.tracker().view(filter, &search).await;
    Ok(Json(views.into_iter().map(TaskEntry::from).collect()))
}

/// POST /api/tasks - Add a task
async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskEntry>), ApiError> {
    let priority = match req.priority.as_deref() {
        Some(raw) => raw
            .parse::<TaskPriority>()
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?,
        None => TaskPriority::default(),
    };
    let input = AddTask {
        text: req.text,
        priority,
        date: req.date,
        time: req.time,
    };

    let tracker = state.tracker();
    let created = tracker.add(input).await.map_err(core_error)?;
    Ok((StatusCode::CREATED, Json(entry(created, tracker.now()))))
}

/// GET /api/tasks/{id} - Get a single task
async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskEntry>, ApiError> {
    let tracker = state.tracker();
    match tracker.store().get(id).await {
        Some(task) => Ok(Json(entry(task, tracker.now()))),
        None => Err(not_found(id)),
    }
}

/// PATCH /api/tasks/{id} - Edit the task text
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<TaskEntry>, ApiError> {
    let tracker = state.tracker();
    let task = tracker
        .edit(id, req.text.as_deref())
        .await
        .map_err(core_error)?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(entry(task, tracker.now())))
}

/// POST /api/tasks/{id}/toggle - Flip completion
async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskEntry>, ApiError> {
    let tracker = state.tracker();
    let task = tracker
        .toggle_complete(id)
        .await
        .map_err(core_error)?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(entry(task, tracker.now())))
}

/// DELETE /api/tasks/{id} - Delete a task
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    match state.tracker().delete(id).await.map_err(core_error)? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(not_found(id)),
    }
}

/// POST /api/tasks/clear-completed - Remove completed tasks
async fn clear_completed(State(state): State<AppState>) -> Result<Json<ClearResponse>, ApiError> {
    let removed = state.tracker().clear_completed().await.map_err(core_error)?;
    Ok(Json(ClearResponse { removed }))
}

/// DELETE /api/tasks?confirm=true - Remove every task
async fn clear_all(
    State(state): State<AppState>,
    Query(query): Query<ClearAllQuery>,
) -> Result<Json<ClearResponse>, ApiError> {
    let removed = state
        .tracker()
        .clear_all(query.confirm)
        .await
        .map_err(core_error)?;
    Ok(Json(ClearResponse { removed }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/tasks",
            get(list_tasks).post(create_task).delete(clear_all),
        )
        .route("/api/tasks/clear-completed", post(clear_completed))
        .route(
            "/api/tasks/{id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .route("/api/tasks/{id}/toggle", post(toggle_task))
}
