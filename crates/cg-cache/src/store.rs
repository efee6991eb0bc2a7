//! TTL-only concurrent cache for typed payloads.
//!
//! Values are stored behind `Arc<dyn Any>` and handed back by clone, so a
//! reader racing a writer on the same key sees either the previous or the new
//! value, never a partially written one. Expiry is lazy: an entry past its
//! deadline is treated as absent by [`CacheStore::get`] and removed on the
//! spot; [`CacheStore::purge_expired`] sweeps the rest.
//!
//! The clock is [`tokio::time::Instant`] so tests can drive expiry with a
//! paused runtime.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::time::Instant;

/// Upper bound applied when `now + ttl` would overflow the clock.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

type Payload = Arc<dyn Any + Send + Sync>;

#[derive(Clone)]
struct CacheEntry {
    value: Payload,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

enum Lookup {
    Fresh(Payload),
    Expired,
    Absent,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    expired: AtomicU64,
}

/// Point-in-time counters for a [`CacheStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Entries currently held, including expired ones not yet purged.
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    /// Entries removed because their TTL elapsed.
    pub expired: u64,
}

/// Process-wide cache keyed by request fingerprint.
///
/// Create one at startup and share it by `Arc`; it synchronizes internally so
/// callers never lock around it.
#[derive(Default)]
pub struct CacheStore {
    entries: DashMap<String, CacheEntry>,
    counters: Counters,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a fresh value of type `T`.
    ///
    /// Returns `None` when the key is absent, expired, or holds a value of a
    /// different type.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let now = Instant::now();

        // The shard guard must be released before `remove_if` below.
        let lookup = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Lookup::Fresh(entry.value.clone()),
            Some(_) => Lookup::Expired,
            None => Lookup::Absent,
        };

        match lookup {
            Lookup::Fresh(value) => match value.downcast_ref::<T>() {
                Some(v) => {
                    self.record_hit();
                    Some(v.clone())
                }
                None => {
                    tracing::warn!(
                        key,
                        expected = std::any::type_name::<T>(),
                        "Cached payload has an unexpected type; treating as miss"
                    );
                    self.record_miss();
                    None
                }
            },
            Lookup::Expired => {
                if self
                    .entries
                    .remove_if(key, |_, entry| entry.is_expired(now))
                    .is_some()
                {
                    self.counters.expired.fetch_add(1, Ordering::Relaxed);
                }
                self.record_miss();
                None
            }
            Lookup::Absent => {
                self.record_miss();
                None
            }
        }
    }

    /// Store `value` under `key` until `expires_at`, replacing any previous entry.
    pub fn set<T>(&self, key: impl Into<String>, value: T, expires_at: Instant)
    where
        T: Send + Sync + 'static,
    {
        let entry = CacheEntry {
            value: Arc::new(value),
            expires_at,
        };
        self.entries.insert(key.into(), entry);
        self.counters.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Store `value` under `key` for `ttl` from now.
    pub fn insert_with_ttl<T>(&self, key: impl Into<String>, value: T, ttl: Duration)
    where
        T: Send + Sync + 'static,
    {
        let now = Instant::now();
        let expires_at = now.checked_add(ttl).unwrap_or(now + MAX_TTL);
        self.set(key, value, expires_at);
    }

    /// Remove an entry regardless of its expiry. Returns `true` if one existed.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every expired entry and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0usize;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        self.counters
            .expired
            .fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            inserts: self.counters.inserts.load(Ordering::Relaxed),
            expired: self.counters.expired.load(Ordering::Relaxed),
        }
    }

    fn record_hit(&self) {
        self.counters.hits.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("cinegate_cache_hits_total").increment(1);
    }

    fn record_miss(&self) {
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("cinegate_cache_misses_total").increment(1);
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.entries.len())
            .field("counters", &self.counters)
            .finish()
    }
}
