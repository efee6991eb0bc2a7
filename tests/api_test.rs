//! End-to-end tests: reqwest client -> gateway -> wiremock upstream.

mod common;

use common::{TestHarness, TEST_API_KEY};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

// ---------------------------------------------------------------------------
// Caching and locale
// ---------------------------------------------------------------------------

#[tokio::test]
async fn genres_hit_upstream_once_within_ttl() {
    let h = TestHarness::start().await;
    Mock::given(method("GET"))
        .and(path("/3/genre/movie/list"))
        .and(query_param("api_key", TEST_API_KEY))
        .and(query_param("language", "fr-FR"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"genres": [{"id": 28, "name": "Action"}]})),
        )
        .expect(1)
        .mount(&h.upstream)
        .await;

    for _ in 0..2 {
        let resp = reqwest::get(h.url("/tmdb/genres?lang=fr-FR")).await.unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["data"][0]["name"], "Action");
    }

    assert_eq!(h.ctx.cache.stats().hits, 1);
}

#[tokio::test]
async fn each_language_is_cached_separately() {
    let h = TestHarness::start().await;
    Mock::given(method("GET"))
        .and(path("/3/genre/movie/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"genres": []})))
        .expect(2)
        .mount(&h.upstream)
        .await;

    let client = reqwest::Client::new();
    for lang in ["en-US", "de-DE", "en-US"] {
        let resp = client
            .get(h.url("/tmdb/genres"))
            .header("accept-language", lang)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }
}

// ---------------------------------------------------------------------------
// Movie detail
// ---------------------------------------------------------------------------

#[tokio::test]
async fn movie_detail_keeps_only_callers_region() {
    let h = TestHarness::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/7"))
        .and(query_param("append_to_response", "credits,videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "title": "Sept",
            "videos": {"results": [{"key": "abc", "site": "YouTube", "type": "Trailer"}]}
        })))
        .mount(&h.upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/movie/7/watch/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "results": {
                "US": {"link": "us-link"},
                "FR": {"link": "fr-link"}
            }
        })))
        .mount(&h.upstream)
        .await;

    let resp = reqwest::Client::new()
        .get(h.url("/tmdb/movies/7"))
        .header("accept-language", "fr-FR,fr;q=0.9")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    let providers = body["data"]["providers"].as_object().unwrap();
    assert_eq!(providers.len(), 1);
    assert_eq!(providers["FR"]["link"], "fr-link");
    assert_eq!(
        body["data"]["videos"]["results"][0]["embed_url"],
        "https://www.youtube.com/embed/abc"
    );
}

#[tokio::test]
async fn unknown_movie_is_404_without_leaking_key() {
    let h = TestHarness::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&h.upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/movie/404/watch/providers"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&h.upstream)
        .await;

    let resp = reqwest::get(h.url("/tmdb/movies/404")).await.unwrap();
    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "not_found");
    assert!(!body["error"].as_str().unwrap().contains(TEST_API_KEY));
}

#[tokio::test]
async fn upstream_server_error_is_502() {
    let h = TestHarness::start().await;
    Mock::given(method("GET"))
        .and(path("/3/watch/providers/regions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.upstream)
        .await;

    let resp = reqwest::get(h.url("/tmdb/regions")).await.unwrap();
    assert_eq!(resp.status(), 502);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "upstream_unavailable");
    assert_eq!(h.ctx.cache.len(), 0);
}

// ---------------------------------------------------------------------------
// Correlation ids
// ---------------------------------------------------------------------------

#[tokio::test]
async fn correlation_id_forwarded_and_echoed() {
    let h = TestHarness::start().await;
    Mock::given(method("GET"))
        .and(path("/3/person/3"))
        .and(header("x-correlation-id", "trace-me"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 3, "name": "Three"})),
        )
        .expect(1)
        .mount(&h.upstream)
        .await;

    let resp = reqwest::Client::new()
        .get(h.url("/tmdb/people/3"))
        .header("x-correlation-id", "trace-me")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["x-correlation-id"], "trace-me");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Three");
}

#[tokio::test]
async fn correlation_id_generated_when_missing() {
    let h = TestHarness::start().await;
    let resp = reqwest::get(h.url("/alive")).await.unwrap();

    assert_eq!(resp.status(), 200);
    let id = resp.headers()["x-correlation-id"].to_str().unwrap();
    assert_eq!(id.len(), 36);
}

// ---------------------------------------------------------------------------
// Discover and search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn discover_forwards_filter_and_enriches() {
    let h = TestHarness::start().await;
    Mock::given(method("GET"))
        .and(path("/3/discover/movie"))
        .and(query_param("page", "2"))
        .and(query_param("sort_by", "vote_average.desc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": 1}, {"id": 2}]})),
        )
        .mount(&h.upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/movie/1/watch/providers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 1, "results": {"US": {"link": "one"}}})),
        )
        .mount(&h.upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/movie/2/watch/providers"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&h.upstream)
        .await;

    let resp = reqwest::Client::new()
        .post(h.url("/tmdb/movies/discover"))
        .json(&json!({"page": 2, "sort": "rating"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"][0]["providers"]["US"]["link"], "one");
    assert_eq!(body["data"][1]["id"], 2);
    assert!(body["data"][1]["providers"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn search_merges_movies_and_people() {
    let h = TestHarness::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("query", "batman"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": 268}]})),
        )
        .mount(&h.upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/search/person"))
        .and(query_param("query", "batman"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": [{"id": 1, "name": "Adam West"}]})),
        )
        .mount(&h.upstream)
        .await;

    let resp = reqwest::Client::new()
        .post(h.url("/tmdb/search"))
        .json(&json!({"query": "  batman "}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["movies"][0]["id"], 268);
    assert_eq!(body["data"]["people"][0]["name"], "Adam West");
}

// ---------------------------------------------------------------------------
// Ops
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_cache_entries() {
    let h = TestHarness::start().await;
    let resp = reqwest::get(h.url("/health")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cache_entries"], 0);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
