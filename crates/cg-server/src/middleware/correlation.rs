//! Correlation id middleware.
//!
//! Reads `x-correlation-id` from the request, or generates a UUID when it is
//! absent or blank, stores it in the request extensions, runs the request
//! inside a span carrying it, and echoes it on the response.

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;

use cg_core::CorrelationId;
use cg_tmdb::CORRELATION_HEADER;

/// Header name used for the correlation identifier.
pub static X_CORRELATION_ID: HeaderName = HeaderName::from_static(CORRELATION_HEADER);

pub async fn correlation_middleware(mut request: Request<Body>, next: Next) -> Response {
    let header = request
        .headers()
        .get(&X_CORRELATION_ID)
        .and_then(|v| v.to_str().ok());
    let id = CorrelationId::from_header(header);

    request.extensions_mut().insert(id.clone());

    let span = tracing::info_span!(
        "request",
        correlation_id = %id,
        method = %request.method(),
        path = %request.uri().path(),
    );
    let mut response = next.run(request).instrument(span).await;

    if let Ok(val) = HeaderValue::from_str(id.as_str()) {
        response.headers_mut().insert(X_CORRELATION_ID.clone(), val);
    }

    response
}
