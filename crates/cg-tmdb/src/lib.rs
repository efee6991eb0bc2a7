//! cg-tmdb: the metadata aggregation gateway.
//!
//! Layers, bottom-up:
//!
//! - [`client`] -- the [`Transport`] seam and its reqwest implementation,
//!   plus [`UpstreamClient`] which decodes JSON bodies.
//! - [`fetcher`] -- cache-aside reads through a shared [`cg_cache::CacheStore`].
//! - [`gateway`] -- the public operations: URL construction, joint fetches and
//!   per-item provider enrichment.
//! - [`types`] -- the upstream wire shapes we consume and return.

pub mod client;
pub mod discover;
pub mod fetcher;
pub mod gateway;
pub mod sampling;
pub mod types;

pub use client::{HttpTransport, Transport, UpstreamClient, CORRELATION_HEADER};
pub use discover::{DiscoverFilter, SortOrder};
pub use fetcher::CachedFetcher;
pub use gateway::{Gateway, GatewayConfig};
pub use reqwest::Url;
pub use sampling::{FixedIndex, IndexSource, ThreadRngIndex};
