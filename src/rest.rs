// Copyright 2026 Reelstat Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API for Reelstat.
//!
//! One analysis endpoint plus a health check, CORS open to any origin.
//! Each request runs the full fetch → clean → analyze pipeline; requests
//! share no mutable state, so there is nothing to lock.

use crate::acquisition::http_client::HttpClient;
use crate::analysis::{self, Answers};
use crate::dataset;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared state passed to request handlers. Read-only after startup.
pub struct AppState {
    pub started_at: Instant,
    pub http: HttpClient,
    pub source_url: String,
}

impl AppState {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            started_at: Instant::now(),
            http: HttpClient::new(dataset::FETCH_TIMEOUT_MS),
            source_url: source_url.into(),
        }
    }
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/", post(handle_analyze))
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server on the given port.
pub async fn start(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    serve(listener, state).await
}

/// Serve requests on a pre-bound listener (tests bind an ephemeral port).
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    info!("REST API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.started_at.elapsed().as_secs_f64(),
    }))
}

/// Run the pipeline and return the answer envelope.
///
/// An empty POST body is the whole request; there are no parameters.
/// Acquisition failure maps to 500 with a message, analysis failures
/// degrade to sentinels inside a 200 (the analyzer never errors out).
async fn handle_analyze(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    info!("analysis request received");
    match dataset::fetch_dataset(&state.http, &state.source_url).await {
        Ok(films) => {
            let answers = analysis::analyze(&films);
            (StatusCode::OK, Json(success_envelope(&answers)))
        }
        Err(e) => {
            error!("failed to fetch or parse source data: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(error_envelope(&format!(
                    "Failed to fetch or parse data: {e}"
                ))),
            )
        }
    }
}

fn success_envelope(answers: &Answers) -> Value {
    json!({
        "status": "success",
        "data": {
            "answers": {
                "q1_movies_2bn_before_2000": answers.blockbusters_before_2000,
                "q2_earliest_1.5bn_film": answers.earliest_blockbuster,
                "q3_rank_peak_correlation": answers.rank_peak_correlation,
                "q4_visualization": answers.visualization,
            }
        },
        "error": null,
    })
}

fn error_envelope(message: &str) -> Value {
    json!({
        "status": "error",
        "data": null,
        "error": message,
    })
}
