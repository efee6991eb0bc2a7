//! cg-cache: process-local response cache.
//!
//! - [`CacheStore`] -- thread-safe, TTL-only key/value store for typed payloads.
//! - [`fingerprint`] -- derives stable, identifier-safe cache keys from URLs.

pub mod fingerprint;
pub mod store;

pub use fingerprint::fingerprint;
pub use store::{CacheStats, CacheStore};
