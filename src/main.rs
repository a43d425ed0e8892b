// main.rs
mod commands;
mod config;
mod dashboard;
mod devices;
mod docs;
mod error;
mod events;
mod handlers;
mod metrics;
mod models;
mod speech;
mod utils;

use axum::{Router, response::Redirect, routing::{get, post}};
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;
use std::sync::Arc;
use handlers::*;
use models::AppState;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::permanent("/static/") }))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/devices/{device_id}/{action}", post(press_device))
        .route("/api/controls/{control}", post(press_control))
        .route("/api/listen", post(listen))
        .route("/ws/client", get(handle_client_ws_upgrade))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", docs::ApiDoc::openapi()))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = config::Settings::new()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    if settings.metrics.enabled {
        metrics::setup_metrics(settings.metrics.port)?;
    }

    let speech = speech::create_speech_service(&settings.speech);
    let state = Arc::new(AppState::new(speech, settings.server.max_connections as usize));
    events::log_events(&state.events);
    metrics::record_events(&state.events);

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.server.address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind address: {}", e))?;

    tracing::info!("Server started on {}", settings.server.address);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
