//! Axum router construction.
//!
//! Builds the full application router with all route groups, middleware
//! layers, and the Swagger UI.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::context::AppContext;
use crate::middleware::correlation::{correlation_middleware, X_CORRELATION_ID};
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(title = "cinegate", description = "Cache-backed, locale-aware movie metadata gateway"),
    paths(
        routes::tmdb::get_genres,
        routes::tmdb::get_providers,
        routes::tmdb::get_regions,
        routes::tmdb::get_movie,
        routes::tmdb::get_movie_providers,
        routes::tmdb::discover_movies,
        routes::tmdb::get_person,
        routes::tmdb::get_random_person,
        routes::tmdb::search,
        routes::health::health_check,
        routes::health::alive,
        routes::cache::cache_stats,
    ),
    components(schemas(
        routes::tmdb::SearchRequest,
        routes::health::HealthResponse,
        routes::cache::CacheStatsResponse,
        cg_tmdb::DiscoverFilter,
        cg_tmdb::SortOrder,
        cg_tmdb::types::Movie,
        cg_tmdb::types::Person,
        cg_tmdb::types::Genre,
        cg_tmdb::types::Region,
        cg_tmdb::types::ProviderDetails,
        cg_tmdb::types::CountryWatchProvider,
        cg_tmdb::types::SearchMultiResult,
    ))
)]
pub struct ApiDoc;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([X_CORRELATION_ID.clone()]);

    let tmdb_routes = Router::new()
        .route("/genres", get(routes::tmdb::get_genres))
        .route("/providers", get(routes::tmdb::get_providers))
        .route("/regions", get(routes::tmdb::get_regions))
        .route("/movies/discover", post(routes::tmdb::discover_movies))
        .route("/movies/{id}", get(routes::tmdb::get_movie))
        .route(
            "/movies/{id}/providers",
            get(routes::tmdb::get_movie_providers),
        )
        .route("/people/random", get(routes::tmdb::get_random_person))
        .route("/people/{id}", get(routes::tmdb::get_person))
        .route("/search", post(routes::tmdb::search));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/alive", get(routes::health::alive))
        .route("/cache/stats", get(routes::cache::cache_stats))
        .route("/metrics", get(routes::metrics::metrics_handler))
        .nest("/tmdb", tmdb_routes)
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(correlation_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
