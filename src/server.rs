//! Dashboard HTTP service.
//!
//! Serves the merged benchmark payload, a health probe, the CI notification
//! webhook and the static dashboard assets.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::config::BenchboardConfig;
use crate::{store, webhook, Benchmark};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    config: Arc<BenchboardConfig>,
}

/// Build the service router.
pub fn router(config: Arc<BenchboardConfig>) -> Router {
    let static_dir = config.server.static_dir.clone();
    let state = AppState { config };

    Router::new()
        .route("/data", get(get_data))
        .route("/api/health", get(health_check))
        .route("/notify", post(notify))
        .nest_service("/static", ServeDir::new(&static_dir))
        .fallback_service(ServeFile::new(static_dir.join("index.html")))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Bind and run the service until shutdown.
pub async fn serve(config: BenchboardConfig) -> Result<()> {
    let bind = config.server.bind;
    let app = router(Arc::new(config));

    info!("starting benchboard server on {}", bind);

    let listener = TcpListener::bind(&bind)
        .await
        .context("failed to bind server")?;

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

// API Handlers

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "benchboard",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// The merged benchmark payload, rescanned from disk on every request.
async fn get_data(State(state): State<AppState>) -> Result<Json<Vec<Benchmark>>, StatusCode> {
    let results_dir = state.config.server.results_dir.clone();
    match tokio::task::spawn_blocking(move || store::scan(&results_dir)).await {
        Ok(benchmarks) => Ok(Json(benchmarks)),
        Err(err) => {
            warn!(%err, "results scan failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn notify(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> StatusCode {
    let signature = headers
        .get(webhook::SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    let Some(signature) = signature else {
        warn!("rejecting notification without a signature");
        return StatusCode::FORBIDDEN;
    };
    if !webhook::verify_signature(&state.config.webhook.secret, &body, signature) {
        warn!("rejecting notification with an invalid signature");
        return StatusCode::FORBIDDEN;
    }

    let notification: webhook::Notification = match serde_json::from_slice(&body) {
        Ok(notification) => notification,
        Err(err) => {
            warn!(%err, "malformed notification payload");
            return StatusCode::BAD_REQUEST;
        }
    };

    match webhook::dispatch(
        &state.config.webhook,
        &state.config.server.results_dir,
        &notification,
    ) {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            error!(%err, "benchmark dispatch failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
