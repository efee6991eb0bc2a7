//! Error-to-HTTP response conversion.
//!
//! Handlers return `Result<_, AppError>`; the error renders as
//! `{ "error", "code", "correlation_id" }` with a status derived from
//! [`cg_core::Error::http_status`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use cg_core::{CorrelationId, Error};

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: Error,
    correlation_id: Option<String>,
}

impl AppError {
    pub fn new(inner: Error) -> Self {
        Self {
            inner,
            correlation_id: None,
        }
    }

    pub fn with_correlation_id(mut self, id: &CorrelationId) -> Self {
        self.correlation_id = Some(id.as_str().to_string());
        self
    }

    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match &self.inner {
            Error::UpstreamNotFound { .. } => "not_found",
            Error::UpstreamUnavailable { .. } => "upstream_unavailable",
            Error::Decode { .. } => "decode_error",
            Error::Validation(_) => "validation_error",
            Error::Config(_) => "config_error",
            Error::Io { .. } => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        } else {
            tracing::debug!(status = %status, error = %self.inner, "Request failed");
        }

        let body = json!({
            "error": self.inner.to_string(),
            "code": self.code(),
            "correlation_id": self.correlation_id,
        });

        (status, Json(body)).into_response()
    }
}
