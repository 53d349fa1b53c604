//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    version: String,
    data_dir: String,
    tasks: usize,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_dir: state.data_dir().to_string_lossy().to_string(),
        tasks: state.tracker().store().len().await,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use dt_core::tracker::AddTask;
    use serde_json::Value;

    use crate::routes::test_support::{app, build_state, send};

    #[tokio::test]
    async fn health_reports_status_and_task_count() {
        let (state, temp_dir) = build_state().await;
        let (status, payload) = send(app(state.clone()), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["tasks"], 0);
        assert_eq!(
            payload["dataDir"],
            Value::from(temp_dir.path().to_string_lossy().to_string())
        );

        state
            .tracker()
            .add(AddTask::new("Pay rent", "2030-01-15"))
            .await
            .unwrap();
        let (_, payload) = send(app(state), "GET", "/health", None).await;
        assert_eq!(payload["tasks"], 1);
    }
}
