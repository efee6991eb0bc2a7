//! Application configuration types.
//!
//! The top-level [`Config`] struct carries every sub-config for the server,
//! the upstream provider, the cache and locale fallbacks. Every section
//! defaults sensibly so an empty file is valid; only the upstream API key has
//! no usable default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
    pub locale: LocaleConfig,
}

impl Config {
    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.upstream.api_key.trim().is_empty() {
            warnings.push("upstream.api_key is empty; every upstream call will be rejected".into());
        }

        if !(self.upstream.api_url.starts_with("http://")
            || self.upstream.api_url.starts_with("https://"))
        {
            warnings.push(format!(
                "upstream.api_url '{}' is not an http(s) URL",
                self.upstream.api_url
            ));
        }

        if self.upstream.requests_per_second == 0 {
            warnings.push("upstream.requests_per_second is 0; outbound rate limiting disabled".into());
        }

        if self.cache.default_ttl_days == 0 || self.cache.reference_ttl_days == 0 {
            warnings.push("cache TTL of 0 days disables caching for affected requests".into());
        }

        if self.cache.sweep_interval_secs == 0 {
            warnings.push("cache.sweep_interval_secs is 0; background sweeping disabled".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// Upstream metadata provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL without the API version segment.
    pub api_url: String,
    pub api_key: String,
    pub request_timeout_secs: u64,
    /// Outbound request budget. `0` disables the limiter.
    pub requests_per_second: u32,
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.themoviedb.org".into(),
            api_key: String::new(),
            request_timeout_secs: 30,
            requests_per_second: 40,
        }
    }
}

/// Response cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// TTL for ordinary lookups (movies, people, searches).
    pub default_ttl_days: u64,
    /// TTL for near-static reference data (genres, providers, regions).
    pub reference_ttl_days: u64,
    /// How often the background sweeper purges expired entries. `0` disables it.
    pub sweep_interval_secs: u64,
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        days(self.default_ttl_days)
    }

    pub fn reference_ttl(&self) -> Duration {
        days(self.reference_ttl_days)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_days: 7,
            reference_ttl_days: 365,
            sweep_interval_secs: 300,
        }
    }
}

/// Fallbacks used when the client supplies no usable locale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    pub default_language: String,
    pub default_region: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_language: crate::locale::DEFAULT_LANGUAGE.into(),
            default_region: crate::locale::DEFAULT_REGION.into(),
        }
    }
}

fn days(n: u64) -> Duration {
    Duration::from_secs(n * 24 * 60 * 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_valid() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.upstream.api_url, "https://api.themoviedb.org");
        assert_eq!(config.cache.default_ttl_days, 7);
        assert_eq!(config.cache.reference_ttl_days, 365);
        assert_eq!(config.locale.default_language, "en-US");
        assert_eq!(config.locale.default_region, "US");
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"upstream": {"api_key": "k"}, "cache": {"default_ttl_days": 1}}"#)
                .unwrap();
        assert_eq!(config.upstream.api_key, "k");
        assert_eq!(config.upstream.request_timeout_secs, 30);
        assert_eq!(config.cache.default_ttl_days, 1);
        assert_eq!(config.cache.reference_ttl_days, 365);
    }

    #[test]
    fn durations() {
        let cache = CacheConfig::default();
        assert_eq!(cache.default_ttl(), Duration::from_secs(7 * 86_400));
        assert_eq!(cache.reference_ttl(), Duration::from_secs(365 * 86_400));
        assert_eq!(cache.sweep_interval(), Some(Duration::from_secs(300)));

        let disabled = CacheConfig {
            sweep_interval_secs: 0,
            ..CacheConfig::default()
        };
        assert_eq!(disabled.sweep_interval(), None);
    }

    #[test]
    fn missing_api_key_warns() {
        let warnings = Config::default().validate();
        assert!(warnings.iter().any(|w| w.contains("api_key")));
    }

    #[test]
    fn configured_defaults_have_no_other_warnings() {
        let mut config = Config::default();
        config.upstream.api_key = "secret".into();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn bad_url_warns() {
        let mut config = Config::default();
        config.upstream.api_key = "secret".into();
        config.upstream.api_url = "ftp://example.com".into();
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("api_url"));
    }
}
