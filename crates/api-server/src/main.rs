//! API Server for Duetrack
//!
//! Serves the task tracker over HTTP and runs the reminder poller for the
//! lifetime of the process.

mod config;
mod routes;
mod state;

use std::net::SocketAddr;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dt_server=debug,dt_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!("Using data directory: {:?}", config.data_dir);

    let cancel = CancellationToken::new();
    let app_state = AppState::new(&config, cancel.clone()).await;

    let reminders = app_state.tracker().start_reminders(cancel.child_token());

    let app = routes::router()
        .with_state(app_state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("REST API listening on {}", addr);

    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
            shutdown.cancel();
        })
        .await
        .context("Server error")?;

    cancel.cancel();
    reminders.await.context("Reminder poller panicked")?;
    Ok(())
}
