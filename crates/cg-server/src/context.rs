//! Shared application state.
//!
//! [`AppContext`] is cloned into every handler through axum state. Everything
//! inside is either immutable or synchronizes internally, so cloning is just
//! a handful of `Arc` bumps.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;

use cg_cache::CacheStore;
use cg_core::config::Config;
use cg_tmdb::{
    CachedFetcher, Gateway, GatewayConfig, HttpTransport, IndexSource, ThreadRngIndex, Transport,
    UpstreamClient,
};

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub gateway: Arc<Gateway>,
    /// The same store the gateway reads through; exposed for stats and sweeping.
    pub cache: Arc<CacheStore>,
    /// Prometheus recorder handle. `None` when no recorder is installed.
    pub metrics: Option<PrometheusHandle>,
    pub started_at: DateTime<Utc>,
}

impl AppContext {
    /// Build the production context: reqwest transport, thread RNG.
    pub fn new(config: Config, metrics: Option<PrometheusHandle>) -> cg_core::Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config.upstream)?);
        Ok(Self::with_parts(config, transport, Arc::new(ThreadRngIndex), metrics))
    }

    /// Build a context around an arbitrary transport and index source.
    pub fn with_parts(
        config: Config,
        transport: Arc<dyn Transport>,
        index_source: Arc<dyn IndexSource>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let cache = Arc::new(CacheStore::new());
        let fetcher = CachedFetcher::new(UpstreamClient::new(transport), cache.clone());
        let gateway = Gateway::new(fetcher, GatewayConfig::from_config(&config), index_source);

        Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
            cache,
            metrics,
            started_at: Utc::now(),
        }
    }
}
