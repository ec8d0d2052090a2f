//! HTTP surface: the scoring API plus the static front end.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use phishguard_core::{ScoreResponse, ScoringService};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::error;

pub const NOT_LOADED_DETAIL: &str = "Model or schema not loaded.";

/// Shared application state. `service` is `None` when the artifacts failed
/// to load at startup; the server still answers health checks in that case.
#[derive(Clone, Default)]
pub struct AppState {
    pub service: Option<Arc<ScoringService>>,
}

impl AppState {
    pub fn new(service: Option<Arc<ScoringService>>) -> Self {
        Self { service }
    }

    pub fn model_loaded(&self) -> bool {
        self.service.is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Every scoring failure is reported as a 500 with a `detail` message.
#[derive(Debug)]
pub struct ApiError(String);

impl ApiError {
    pub fn not_loaded() -> Self {
        Self(NOT_LOADED_DETAIL.to_string())
    }

    pub fn analysis(err: impl std::fmt::Display) -> Self {
        Self(format!("Error during analysis: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse { detail: self.0 });
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// API routes only, without static files or middleware.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/score", post(score_handler))
        .route("/api/health", get(health_handler))
        .with_state(state)
}

/// Full application: API, static fallback, CORS and request tracing.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api_router(state)
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_loaded: state.model_loaded(),
    })
}

async fn score_handler(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let service = state.service.ok_or_else(ApiError::not_loaded)?;

    match service.score_text(&request.text) {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!("Scoring failed: {}", e);
            Err(ApiError::analysis(e))
        }
    }
}
