//! Cache-aside reads.

use std::sync::Arc;
use std::time::Duration;

use cg_cache::{fingerprint, CacheStore};
use cg_core::{CorrelationId, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::client::UpstreamClient;

/// Serves decoded upstream payloads from the shared cache, fetching and
/// storing them on a miss.
///
/// Concurrent misses on the same URL are not coalesced; each may reach the
/// upstream and the last writer wins. Failed fetches are never cached.
#[derive(Debug, Clone)]
pub struct CachedFetcher {
    client: UpstreamClient,
    cache: Arc<CacheStore>,
}

impl CachedFetcher {
    pub fn new(client: UpstreamClient, cache: Arc<CacheStore>) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    pub async fn fetch_cached<T>(
        &self,
        url: &Url,
        correlation_id: &CorrelationId,
        ttl: Duration,
    ) -> Result<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let key = fingerprint(url.as_str());

        if let Some(hit) = self.cache.get::<T>(&key) {
            trace!(path = url.path(), "Cache hit");
            return Ok(hit);
        }

        trace!(path = url.path(), "Cache miss");
        let value: T = self.client.fetch_json(url, correlation_id).await?;
        self.cache.insert_with_ttl(key, value.clone(), ttl);
        Ok(value)
    }
}
