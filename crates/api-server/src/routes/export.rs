//! CSV download

use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    routing::get,
    Router,
};

use super::{core_error, ApiError};
use crate::state::AppState;

/// GET /api/export - Download every task as CSV
async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let export = state.tracker().export_csv().await.map_err(core_error)?;
    let headers = [
        (CONTENT_TYPE, format!("{}; charset=utf-8", export.content_type)),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.file_name),
        ),
    ];
    Ok((headers, export.body))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/export", get(export_csv))
}
