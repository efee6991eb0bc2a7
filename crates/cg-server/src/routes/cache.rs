//! Cache introspection.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use cg_cache::CacheStats;

use crate::context::AppContext;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CacheStatsResponse {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub expired: u64,
    /// `hits / (hits + misses)`, or `0.0` before the first lookup.
    pub hit_ratio: f64,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        let lookups = stats.hits + stats.misses;
        let hit_ratio = if lookups == 0 {
            0.0
        } else {
            stats.hits as f64 / lookups as f64
        };
        Self {
            entries: stats.entries,
            hits: stats.hits,
            misses: stats.misses,
            inserts: stats.inserts,
            expired: stats.expired,
            hit_ratio,
        }
    }
}

/// GET /cache/stats
#[utoipa::path(
    get,
    path = "/cache/stats",
    tag = "ops",
    responses(
        (status = 200, description = "Response cache counters", body = CacheStatsResponse)
    )
)]
pub async fn cache_stats(State(ctx): State<AppContext>) -> Json<CacheStatsResponse> {
    Json(ctx.cache.stats().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_ratio() {
        let stats = CacheStats {
            entries: 2,
            hits: 3,
            misses: 1,
            inserts: 1,
            expired: 0,
        };
        let response = CacheStatsResponse::from(stats);
        assert!((response.hit_ratio - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn hit_ratio_without_lookups() {
        let stats = CacheStats {
            entries: 0,
            hits: 0,
            misses: 0,
            inserts: 0,
            expired: 0,
        };
        assert_eq!(CacheStatsResponse::from(stats).hit_ratio, 0.0);
    }
}
