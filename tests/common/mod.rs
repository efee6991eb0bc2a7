//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which starts a `wiremock` upstream, points a full
//! [`AppContext`] at it and serves the router on a random port.

use std::net::SocketAddr;

use wiremock::MockServer;

use cg_core::config::Config;
use cg_server::context::AppContext;
use cg_server::router::build_router;

pub const TEST_API_KEY: &str = "test-key";

/// A running gateway wired to a mock upstream.
pub struct TestHarness {
    pub ctx: AppContext,
    pub upstream: MockServer,
    pub addr: SocketAddr,
}

impl TestHarness {
    /// Start a mock upstream and the gateway with default configuration.
    pub async fn start() -> Self {
        Self::with_config(Config::default()).await
    }

    /// Start with a custom configuration. The upstream URL and API key are
    /// always replaced with the mock server's.
    pub async fn with_config(mut config: Config) -> Self {
        let upstream = MockServer::start().await;
        config.upstream.api_url = upstream.uri();
        config.upstream.api_key = TEST_API_KEY.into();
        config.upstream.request_timeout_secs = 5;

        let ctx = AppContext::new(config, None).expect("failed to build context");
        let app = build_router(ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            ctx,
            upstream,
            addr,
        }
    }

    /// Absolute URL for a gateway path.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}
