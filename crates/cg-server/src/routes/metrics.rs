//! Prometheus metrics endpoint.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::context::AppContext;

/// GET /metrics -- Prometheus-format metrics.
pub async fn metrics_handler(State(ctx): State<AppContext>) -> impl IntoResponse {
    let body = match &ctx.metrics {
        Some(handle) => handle.render(),
        None => "# No metrics recorder installed\n".to_string(),
    };
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}
