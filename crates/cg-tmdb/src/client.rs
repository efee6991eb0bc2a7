//! Upstream HTTP access.
//!
//! [`Transport`] is the single I/O seam of the gateway: one GET, one body.
//! [`HttpTransport`] implements it over reqwest with an optional outbound
//! rate limiter; tests substitute their own implementation.
//!
//! Upstream URLs carry the API key in the query string, so only
//! [`reqwest::Url::path`] is ever logged or placed in an error.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use cg_core::config::UpstreamConfig;
use cg_core::{CorrelationId, Error, Result};
use governor::{Quota, RateLimiter};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Header carrying the request correlation id on every outbound call.
pub const CORRELATION_HEADER: &str = "x-correlation-id";

type DirectLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Performs a single GET and returns the body of a successful response.
///
/// Implementations classify failures: 404 becomes
/// [`Error::UpstreamNotFound`], every other failure
/// [`Error::UpstreamUnavailable`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url, correlation_id: &CorrelationId) -> Result<String>;
}

// ---------------------------------------------------------------------------
// reqwest transport
// ---------------------------------------------------------------------------

pub struct HttpTransport {
    http: reqwest::Client,
    limiter: Option<DirectLimiter>,
}

impl HttpTransport {
    /// Build a transport with the configured timeout and request budget.
    /// A budget of `0` requests per second disables the limiter.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        let limiter = NonZeroU32::new(config.requests_per_second)
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));

        Ok(Self { http, limiter })
    }

    async fn send(&self, url: &Url, correlation_id: &CorrelationId) -> Result<String> {
        let path = url.path();

        let resp = self
            .http
            .get(url.clone())
            .header(CORRELATION_HEADER, correlation_id.as_str())
            .send()
            .await
            .map_err(|e| {
                Error::upstream_unavailable(None, format!("GET {path} failed: {}", e.without_url()))
            })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::upstream_not_found(path));
        }
        if !status.is_success() {
            return Err(Error::upstream_unavailable(
                Some(status.as_u16()),
                format!("GET {path} returned {status}"),
            ));
        }

        resp.text().await.map_err(|e| {
            Error::upstream_unavailable(None, format!("reading body of {path} failed: {}", e.without_url()))
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url, correlation_id: &CorrelationId) -> Result<String> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let started = Instant::now();
        let result = self.send(url, correlation_id).await;
        let elapsed = started.elapsed();

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) if e.is_not_found() => "not_found",
            Err(_) => "error",
        };
        metrics::counter!("cinegate_upstream_requests_total", "outcome" => outcome).increment(1);
        metrics::histogram!("cinegate_upstream_request_duration_seconds")
            .record(elapsed.as_secs_f64());

        debug!(
            path = url.path(),
            outcome,
            elapsed_ms = elapsed.as_millis() as u64,
            correlation_id = %correlation_id,
            "Upstream request finished"
        );

        result
    }
}

// ---------------------------------------------------------------------------
// JSON client
// ---------------------------------------------------------------------------

/// Fetches and decodes upstream JSON through a [`Transport`].
#[derive(Clone)]
pub struct UpstreamClient {
    transport: Arc<dyn Transport>,
}

impl UpstreamClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// GET `url` and decode the body as `T`.
    pub async fn fetch_json<T>(&self, url: &Url, correlation_id: &CorrelationId) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let body = self.transport.get(url, correlation_id).await?;
        serde_json::from_str(&body).map_err(|e| {
            debug!(path = url.path(), error = %e, "Upstream payload did not decode");
            Error::decode(std::any::type_name::<T>(), e.to_string())
        })
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde::Deserialize;

    struct FixedBody(&'static str);

    #[async_trait]
    impl Transport for FixedBody {
        async fn get(&self, _url: &Url, _cid: &CorrelationId) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Debug, Deserialize)]
    struct Thing {
        id: u64,
    }

    fn url() -> Url {
        Url::parse("http://upstream.test/3/thing?api_key=secret").unwrap()
    }

    #[tokio::test]
    async fn decodes_json_body() {
        let client = UpstreamClient::new(Arc::new(FixedBody(r#"{"id": 7}"#)));
        let thing: Thing = client.fetch_json(&url(), &CorrelationId::new()).await.unwrap();
        assert_eq!(thing.id, 7);
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let client = UpstreamClient::new(Arc::new(FixedBody("<html>")));
        let err = client
            .fetch_json::<Thing>(&url(), &CorrelationId::new())
            .await
            .unwrap_err();
        assert_matches!(err, Error::Decode { target, .. } if target.ends_with("Thing"));
    }

    #[test]
    fn zero_rps_disables_limiter() {
        let config = UpstreamConfig {
            requests_per_second: 0,
            ..UpstreamConfig::default()
        };
        let transport = HttpTransport::new(&config).unwrap();
        assert!(transport.limiter.is_none());

        let transport = HttpTransport::new(&UpstreamConfig::default()).unwrap();
        assert!(transport.limiter.is_some());
    }
}
