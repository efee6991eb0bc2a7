//! Metadata aggregation gateway.
//!
//! Each operation builds one or more upstream URLs for the caller's locale,
//! reads them through the [`CachedFetcher`] and assembles the response.
//!
//! Two composition shapes are used:
//!
//! - **Joint fetches** (`get_movie`, `search_multi`) run their branches with
//!   `tokio::try_join!`; any branch failing fails the call.
//! - **Enrichment fan-out** (`discover_movies`) looks up providers for every
//!   movie concurrently via `join_all`. A failed lookup leaves that movie
//!   without providers and is logged; the call itself still succeeds.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use cg_cache::CacheStore;
use cg_core::config::Config;
use cg_core::{CorrelationId, Error, Locale, Result};
use futures::future::join_all;
use reqwest::Url;
use tracing::{debug, warn};

use crate::discover::DiscoverFilter;
use crate::fetcher::CachedFetcher;
use crate::sampling::{pick_clamped, IndexSource, PagePosition, POPULAR_PAGE_SIZE, POPULAR_POPULATION};
use crate::types::{
    CountryWatchProvider, Genre, GenreList, Movie, MoviePage, Person, PersonPage, ProviderDetails,
    ProviderList, Region, RegionList, SearchMultiResult, WatchProviderResponse,
};

const MOVIE_DETAILS_APPEND: &str = "credits,videos";
const PERSON_DETAILS_APPEND: &str = "credits,images,tagged_images";

/// Upstream location, credentials and cache lifetimes.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL without the `/3` version segment.
    pub api_url: String,
    pub api_key: String,
    /// TTL for per-title lookups and searches.
    pub default_ttl: Duration,
    /// TTL for reference data (genres, providers, regions).
    pub reference_ttl: Duration,
}

impl GatewayConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_url: config.upstream.api_url.clone(),
            api_key: config.upstream.api_key.clone(),
            default_ttl: config.cache.default_ttl(),
            reference_ttl: config.cache.reference_ttl(),
        }
    }
}

pub struct Gateway {
    fetcher: CachedFetcher,
    config: GatewayConfig,
    index_source: Arc<dyn IndexSource>,
}

impl Gateway {
    pub fn new(fetcher: CachedFetcher, config: GatewayConfig, index_source: Arc<dyn IndexSource>) -> Self {
        Self {
            fetcher,
            config,
            index_source,
        }
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        self.fetcher.cache()
    }

    // -----------------------------------------------------------------------
    // Movies
    // -----------------------------------------------------------------------

    /// Discover movies and attach each one's providers for `locale.region`.
    ///
    /// Results keep upstream order. Provider lookups that fail leave the
    /// movie's `providers` empty.
    pub async fn discover_movies(
        &self,
        filter: &DiscoverFilter,
        locale: &Locale,
        correlation_id: &CorrelationId,
    ) -> Result<Vec<Movie>> {
        let extra = filter.query_pairs();
        let extra: Vec<(&str, &str)> = extra.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let url = self.url("/3/discover/movie", locale, &extra)?;

        let page: MoviePage = self
            .fetcher
            .fetch_cached(&url, correlation_id, self.config.default_ttl)
            .await?;
        let mut movies = page.results;

        if movies.is_empty() {
            debug!(page = filter.page, "Discover returned no movies");
            return Ok(movies);
        }

        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();
        let lookups = ids
            .iter()
            .map(|&id| self.get_movie_providers(id, &locale.region, locale, correlation_id));
        let outcomes = join_all(lookups).await;

        for (movie, outcome) in movies.iter_mut().zip(outcomes) {
            match outcome {
                Ok(providers) => movie.providers = providers,
                Err(e) => {
                    warn!(
                        movie_id = movie.id,
                        error = %e,
                        correlation_id = %correlation_id,
                        "Provider lookup failed, returning movie without providers"
                    );
                    movie.providers = BTreeMap::new();
                }
            }
        }

        Ok(movies)
    }

    /// Fetch one movie together with its providers for `locale.region`.
    ///
    /// With `include_details` the credits and videos are appended and
    /// YouTube videos receive an embed URL. Both fetches must succeed.
    pub async fn get_movie(
        &self,
        id: u64,
        include_details: bool,
        locale: &Locale,
        correlation_id: &CorrelationId,
    ) -> Result<Movie> {
        let extra: &[(&str, &str)] = if include_details {
            &[("append_to_response", MOVIE_DETAILS_APPEND)]
        } else {
            &[]
        };
        let url = self.url(&format!("/3/movie/{id}"), locale, extra)?;

        let (mut movie, providers) = tokio::try_join!(
            self.fetcher
                .fetch_cached::<Movie>(&url, correlation_id, self.config.default_ttl),
            self.get_movie_providers(id, &locale.region, locale, correlation_id),
        )?;

        movie.providers = providers;
        if let Some(videos) = movie.videos.as_mut() {
            videos.set_embed_links();
        }
        Ok(movie)
    }

    /// Providers for one movie, restricted to the entry for `region`
    /// (compared case-insensitively). No entry yields an empty map.
    pub async fn get_movie_providers(
        &self,
        id: u64,
        region: &str,
        locale: &Locale,
        correlation_id: &CorrelationId,
    ) -> Result<BTreeMap<String, CountryWatchProvider>> {
        let url = self.url(
            &format!("/3/movie/{id}/watch/providers"),
            locale,
            &[("watch_region", region)],
        )?;
        let response: WatchProviderResponse = self
            .fetcher
            .fetch_cached(&url, correlation_id, self.config.default_ttl)
            .await?;
        Ok(response.for_region(region))
    }

    // -----------------------------------------------------------------------
    // Reference data
    // -----------------------------------------------------------------------

    pub async fn get_genres(&self, locale: &Locale, correlation_id: &CorrelationId) -> Result<Vec<Genre>> {
        let url = self.url("/3/genre/movie/list", locale, &[])?;
        let list: GenreList = self
            .fetcher
            .fetch_cached(&url, correlation_id, self.config.reference_ttl)
            .await?;
        Ok(list.genres)
    }

    pub async fn get_providers(
        &self,
        locale: &Locale,
        correlation_id: &CorrelationId,
    ) -> Result<Vec<ProviderDetails>> {
        let url = self.url(
            "/3/watch/providers/movie",
            locale,
            &[("watch_region", locale.region.as_str())],
        )?;
        let list: ProviderList = self
            .fetcher
            .fetch_cached(&url, correlation_id, self.config.reference_ttl)
            .await?;
        Ok(list.results)
    }

    pub async fn get_regions(&self, locale: &Locale, correlation_id: &CorrelationId) -> Result<Vec<Region>> {
        let url = self.url("/3/watch/providers/regions", locale, &[])?;
        let list: RegionList = self
            .fetcher
            .fetch_cached(&url, correlation_id, self.config.reference_ttl)
            .await?;
        Ok(list.results)
    }

    // -----------------------------------------------------------------------
    // People
    // -----------------------------------------------------------------------

    pub async fn get_person(
        &self,
        id: u64,
        include_details: bool,
        locale: &Locale,
        correlation_id: &CorrelationId,
    ) -> Result<Person> {
        let extra: &[(&str, &str)] = if include_details {
            &[("append_to_response", PERSON_DETAILS_APPEND)]
        } else {
            &[]
        };
        let url = self.url(&format!("/3/person/{id}"), locale, extra)?;
        self.fetcher
            .fetch_cached(&url, correlation_id, self.config.default_ttl)
            .await
    }

    /// Pick a person uniformly from the first pages of the popular listing.
    ///
    /// A page shorter than the chosen offset yields its last person; an
    /// empty page is reported as not found.
    pub async fn get_random_person(&self, locale: &Locale, correlation_id: &CorrelationId) -> Result<Person> {
        let index = self.index_source.next_index(POPULAR_POPULATION);
        let position = PagePosition::for_index(index, POPULAR_PAGE_SIZE);

        let page_param = position.page.to_string();
        let url = self.url("/3/person/popular", locale, &[("page", page_param.as_str())])?;
        let page: PersonPage = self
            .fetcher
            .fetch_cached(&url, correlation_id, self.config.default_ttl)
            .await?;

        let len = page.results.len();
        if len > 0 && position.offset >= len {
            debug!(
                page = position.page,
                offset = position.offset,
                len,
                "Popular page shorter than expected, using its last person"
            );
        }

        pick_clamped(page.results, position.offset).ok_or_else(|| {
            Error::upstream_not_found(format!("{} (page {})", url.path(), position.page))
        })
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    pub async fn search_movies(
        &self,
        query: &str,
        locale: &Locale,
        correlation_id: &CorrelationId,
    ) -> Result<Vec<Movie>> {
        let query = require_query(query)?;
        let url = self.url("/3/search/movie", locale, &[("query", query)])?;
        let page: MoviePage = self
            .fetcher
            .fetch_cached(&url, correlation_id, self.config.default_ttl)
            .await?;
        Ok(page.results)
    }

    pub async fn search_people(
        &self,
        query: &str,
        locale: &Locale,
        correlation_id: &CorrelationId,
    ) -> Result<Vec<Person>> {
        let query = require_query(query)?;
        let url = self.url("/3/search/person", locale, &[("query", query)])?;
        let page: PersonPage = self
            .fetcher
            .fetch_cached(&url, correlation_id, self.config.default_ttl)
            .await?;
        Ok(page.results)
    }

    /// Search movies and people concurrently. Either search failing fails
    /// the call.
    pub async fn search_multi(
        &self,
        query: &str,
        locale: &Locale,
        correlation_id: &CorrelationId,
    ) -> Result<SearchMultiResult> {
        let query = require_query(query)?;
        let (movies, people) = tokio::try_join!(
            self.search_movies(query, locale, correlation_id),
            self.search_people(query, locale, correlation_id),
        )?;
        Ok(SearchMultiResult { movies, people })
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Build `{api_url}{path}?api_key=..&language=..` plus `extra` pairs,
    /// percent-encoding every value.
    fn url(&self, path: &str, locale: &Locale, extra: &[(&str, &str)]) -> Result<Url> {
        let base = self.config.api_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{path}"))
            .map_err(|e| Error::Config(format!("invalid upstream URL {base}{path}: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.config.api_key);
            query.append_pair("language", &locale.language);
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

fn require_query(query: &str) -> Result<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::Validation("search query must not be blank".into()));
    }
    Ok(query)
}
