//! Liveness and health endpoints.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::context::AppContext;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: i64,
    pub cache_entries: usize,
}

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    tag = "ops",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    )
)]
pub async fn health_check(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: (Utc::now() - ctx.started_at).num_seconds(),
        cache_entries: ctx.cache.len(),
    })
}

/// GET /alive
#[utoipa::path(
    get,
    path = "/alive",
    tag = "ops",
    responses(
        (status = 200, description = "Process is up", body = String)
    )
)]
pub async fn alive() -> &'static str {
    "ok"
}
