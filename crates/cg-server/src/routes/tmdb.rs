//! Movie metadata route handlers.
//!
//! Each handler resolves the caller's locale and correlation id, calls one
//! gateway operation and wraps the result in [`DataResponse`].

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use cg_core::{CorrelationId, Result};
use cg_tmdb::types::{CountryWatchProvider, Genre, Movie, Person, ProviderDetails, Region, SearchMultiResult};
use cg_tmdb::DiscoverFilter;

use super::DataResponse;
use crate::context::AppContext;
use crate::error::AppError;
use crate::extract::{ClientLocale, Correlation, LangQuery};

type ApiResult<T> = std::result::Result<Json<DataResponse<T>>, AppError>;

fn respond<T>(result: Result<T>, correlation_id: &CorrelationId) -> ApiResult<T> {
    result
        .map(|data| Json(DataResponse::new(data)))
        .map_err(|e| AppError::from(e).with_correlation_id(correlation_id))
}

/// Request body for `POST /tmdb/search`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SearchRequest {
    pub query: String,
}

/// GET /tmdb/genres
#[utoipa::path(
    get,
    path = "/tmdb/genres",
    tag = "tmdb",
    params(LangQuery),
    responses(
        (status = 200, description = "Movie genres", body = DataResponse<Vec<Genre>>),
        (status = 502, description = "Upstream failure")
    )
)]
pub async fn get_genres(
    State(ctx): State<AppContext>,
    Correlation(cid): Correlation,
    ClientLocale(locale): ClientLocale,
) -> ApiResult<Vec<Genre>> {
    respond(ctx.gateway.get_genres(&locale, &cid).await, &cid)
}

/// GET /tmdb/providers
#[utoipa::path(
    get,
    path = "/tmdb/providers",
    tag = "tmdb",
    params(LangQuery),
    responses(
        (status = 200, description = "Watch providers for the caller's region", body = DataResponse<Vec<ProviderDetails>>),
        (status = 502, description = "Upstream failure")
    )
)]
pub async fn get_providers(
    State(ctx): State<AppContext>,
    Correlation(cid): Correlation,
    ClientLocale(locale): ClientLocale,
) -> ApiResult<Vec<ProviderDetails>> {
    respond(ctx.gateway.get_providers(&locale, &cid).await, &cid)
}

/// GET /tmdb/regions
#[utoipa::path(
    get,
    path = "/tmdb/regions",
    tag = "tmdb",
    params(LangQuery),
    responses(
        (status = 200, description = "Regions with watch provider data", body = DataResponse<Vec<Region>>),
        (status = 502, description = "Upstream failure")
    )
)]
pub async fn get_regions(
    State(ctx): State<AppContext>,
    Correlation(cid): Correlation,
    ClientLocale(locale): ClientLocale,
) -> ApiResult<Vec<Region>> {
    respond(ctx.gateway.get_regions(&locale, &cid).await, &cid)
}

/// GET /tmdb/movies/{id}
#[utoipa::path(
    get,
    path = "/tmdb/movies/{id}",
    tag = "tmdb",
    params(("id" = u64, Path, description = "TMDB movie id"), LangQuery),
    responses(
        (status = 200, description = "Movie with credits, videos and regional providers", body = DataResponse<Movie>),
        (status = 404, description = "Unknown movie"),
        (status = 502, description = "Upstream failure")
    )
)]
pub async fn get_movie(
    State(ctx): State<AppContext>,
    Path(id): Path<u64>,
    Correlation(cid): Correlation,
    ClientLocale(locale): ClientLocale,
) -> ApiResult<Movie> {
    respond(ctx.gateway.get_movie(id, true, &locale, &cid).await, &cid)
}

/// GET /tmdb/movies/{id}/providers
#[utoipa::path(
    get,
    path = "/tmdb/movies/{id}/providers",
    tag = "tmdb",
    params(("id" = u64, Path, description = "TMDB movie id"), LangQuery),
    responses(
        (status = 200, description = "Providers keyed by country, restricted to the caller's region", body = DataResponse<BTreeMap<String, CountryWatchProvider>>),
        (status = 404, description = "Unknown movie"),
        (status = 502, description = "Upstream failure")
    )
)]
pub async fn get_movie_providers(
    State(ctx): State<AppContext>,
    Path(id): Path<u64>,
    Correlation(cid): Correlation,
    ClientLocale(locale): ClientLocale,
) -> ApiResult<BTreeMap<String, CountryWatchProvider>> {
    let result = ctx
        .gateway
        .get_movie_providers(id, &locale.region, &locale, &cid)
        .await;
    respond(result, &cid)
}

/// POST /tmdb/movies/discover
#[utoipa::path(
    post,
    path = "/tmdb/movies/discover",
    tag = "tmdb",
    params(LangQuery),
    request_body = DiscoverFilter,
    responses(
        (status = 200, description = "Discovered movies with regional providers", body = DataResponse<Vec<Movie>>),
        (status = 502, description = "Upstream failure")
    )
)]
pub async fn discover_movies(
    State(ctx): State<AppContext>,
    Correlation(cid): Correlation,
    ClientLocale(locale): ClientLocale,
    Json(filter): Json<DiscoverFilter>,
) -> ApiResult<Vec<Movie>> {
    respond(ctx.gateway.discover_movies(&filter, &locale, &cid).await, &cid)
}

/// GET /tmdb/people/{id}
#[utoipa::path(
    get,
    path = "/tmdb/people/{id}",
    tag = "tmdb",
    params(("id" = u64, Path, description = "TMDB person id"), LangQuery),
    responses(
        (status = 200, description = "Person with credits and images", body = DataResponse<Person>),
        (status = 404, description = "Unknown person"),
        (status = 502, description = "Upstream failure")
    )
)]
pub async fn get_person(
    State(ctx): State<AppContext>,
    Path(id): Path<u64>,
    Correlation(cid): Correlation,
    ClientLocale(locale): ClientLocale,
) -> ApiResult<Person> {
    respond(ctx.gateway.get_person(id, true, &locale, &cid).await, &cid)
}

/// GET /tmdb/people/random
#[utoipa::path(
    get,
    path = "/tmdb/people/random",
    tag = "tmdb",
    params(LangQuery),
    responses(
        (status = 200, description = "A random popular person", body = DataResponse<Person>),
        (status = 404, description = "Popular listing page was empty"),
        (status = 502, description = "Upstream failure")
    )
)]
pub async fn get_random_person(
    State(ctx): State<AppContext>,
    Correlation(cid): Correlation,
    ClientLocale(locale): ClientLocale,
) -> ApiResult<Person> {
    respond(ctx.gateway.get_random_person(&locale, &cid).await, &cid)
}

/// POST /tmdb/search
#[utoipa::path(
    post,
    path = "/tmdb/search",
    tag = "tmdb",
    params(LangQuery),
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching movies and people", body = DataResponse<SearchMultiResult>),
        (status = 400, description = "Blank query"),
        (status = 502, description = "Upstream failure")
    )
)]
pub async fn search(
    State(ctx): State<AppContext>,
    Correlation(cid): Correlation,
    ClientLocale(locale): ClientLocale,
    Json(body): Json<SearchRequest>,
) -> ApiResult<SearchMultiResult> {
    respond(ctx.gateway.search_multi(&body.query, &locale, &cid).await, &cid)
}
