//! Display theme endpoints
//!
//! The theme is held in memory only and resets to light on restart.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use dt_core::tracker::Theme;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: Theme,
}

async fn get_theme(State(state): State<AppState>) -> Json<ThemeResponse> {
    Json(ThemeResponse {
        theme: state.tracker().theme().await,
    })
}

async fn toggle_theme(State(state): State<AppState>) -> Json<ThemeResponse> {
    Json(ThemeResponse {
        theme: state.tracker().toggle_theme().await,
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/theme", get(get_theme))
        .route("/api/theme/toggle", post(toggle_theme))
}
