//! HTTP server for recommendation queries.
//!
//! The engine is built once at startup and shared read-only across
//! handlers through an `Arc`; queries take no locks.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/recommend?title=..&limit=..` | Ranked similar titles with scores |
//! | `GET`  | `/stats` | Build report summary |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "title must not be empty" } }
//! ```
//!
//! An unknown title is not an error: it returns `200` with empty `results`.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use cinematch_core::recommend::Recommender;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::engine::build_engine;
use crate::recommend::{recommend_response, RecommendResponse};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    engine: Arc<Recommender>,
    default_limit: usize,
}

/// Build the engine and serve until the process is terminated.
///
/// Binds to `[server].bind`. Construction failures abort before binding.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let engine = build_engine(config)?;
    let state = AppState {
        engine: Arc::new(engine),
        default_limit: config.recommend.default_limit,
    };

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, "server listening");
    println!("Cinematch server listening on http://{}", config.server.bind);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/recommend", get(handle_recommend))
        .route("/stats", get(handle_stats))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /recommend ============

#[derive(Deserialize)]
struct RecommendParams {
    title: Option<String>,
    limit: Option<usize>,
}

/// Handler for `GET /recommend`.
///
/// Returns `400` when `title` is missing or blank, or when the query
/// string does not parse (e.g. a non-numeric `limit`).
async fn handle_recommend(
    State(state): State<AppState>,
    params: Result<Query<RecommendParams>, QueryRejection>,
) -> Result<Json<RecommendResponse>, AppError> {
    let Query(params) = params.map_err(|rejection| bad_request(rejection.body_text()))?;
    let title = params
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| bad_request("title must not be empty"))?;
    let limit = params.limit.unwrap_or(state.default_limit);

    Ok(Json(recommend_response(&state.engine, &title, limit)))
}

// ============ GET /stats ============

#[derive(Serialize)]
struct StatsResponse {
    items: usize,
    vocabulary_size: usize,
    dropped: usize,
    zero_vector_items: usize,
    similarity: &'static str,
}

async fn handle_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let report = state.engine.report();
    Json(StatsResponse {
        items: report.item_count,
        vocabulary_size: report.vocabulary_size,
        dropped: report.dropped.len(),
        zero_vector_items: report.zero_vector_items.len(),
        similarity: report.similarity,
    })
}
