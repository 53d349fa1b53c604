//! Route handlers

pub mod export;
pub mod health;
pub mod notifications;
pub mod task;
pub mod theme;

use axum::{http::StatusCode, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

/// Map a core error to its HTTP status
pub fn core_error(e: dt_core::Error) -> ApiError {
    let status = match &e {
        dt_core::Error::Validation(_) => StatusCode::BAD_REQUEST,
        dt_core::Error::ConfirmationRequired(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, e.user_message())
}

/// All routes, without middleware
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(task::router())
        .merge(export::router())
        .merge(theme::router())
        .merge(notifications::router())
}
