//! TMDB v3 wire types.
//!
//! Only the fields the gateway consumes or returns are modelled. Everything
//! optional upstream is optional here, and list fields accept both a missing
//! key and an explicit `null`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Base URL for embeddable YouTube players.
pub const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed";

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// A paginated upstream listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

pub type MoviePage = Page<Movie>;
pub type PersonPage = Page<Person>;

// ---------------------------------------------------------------------------
// Movies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub adult: bool,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    /// Full genre objects (detail responses).
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    /// Genre ids only (list responses).
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<u64>,
    pub credits: Option<Credits>,
    pub images: Option<Images>,
    pub videos: Option<Videos>,
    /// Watch providers for the caller's region, filled in by the gateway.
    #[serde(default, deserialize_with = "null_as_default")]
    pub providers: BTreeMap<String, CountryWatchProvider>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Credits {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cast: Vec<Credit>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub crew: Vec<Credit>,
}

/// A cast or crew entry. On a movie it describes a person; on a person it
/// describes a movie, hence the mix of person and title fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Credit {
    pub id: u64,
    pub credit_id: Option<String>,
    #[serde(default)]
    pub adult: bool,
    pub name: Option<String>,
    pub character: Option<String>,
    pub job: Option<String>,
    pub department: Option<String>,
    pub order: Option<u32>,
    pub cast_id: Option<u64>,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub profile_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<u64>,
}

// ---------------------------------------------------------------------------
// Videos
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Videos {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Video>,
}

impl Videos {
    /// Attach a player URL to every YouTube-hosted video.
    pub fn set_embed_links(&mut self) {
        for video in &mut self.results {
            video.embed_url = video.youtube_embed_url();
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Video {
    pub id: Option<String>,
    pub key: Option<String>,
    pub name: Option<String>,
    pub site: Option<String>,
    pub size: Option<u32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub iso_639_1: Option<String>,
    pub iso_3166_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
}

impl Video {
    fn youtube_embed_url(&self) -> Option<String> {
        let is_youtube = self
            .site
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("youtube"));
        let key = self.key.as_deref().filter(|k| !k.is_empty())?;
        is_youtube.then(|| format!("{YOUTUBE_EMBED_BASE}/{key}"))
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Images {
    #[serde(default, deserialize_with = "null_as_default")]
    pub profiles: Vec<Image>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub backdrops: Vec<Image>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub posters: Vec<Image>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Image {
    pub file_path: String,
    #[serde(default)]
    pub aspect_ratio: f64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    pub iso_639_1: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TaggedImages {
    #[serde(default)]
    pub page: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<TaggedImage>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TaggedImage {
    pub id: Option<String>,
    pub file_path: String,
    #[serde(default)]
    pub aspect_ratio: f64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    pub iso_639_1: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub image_type: Option<String>,
    pub media_type: Option<String>,
    pub media: Option<TaggedMedia>,
}

/// The title a tagged image belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TaggedMedia {
    pub id: u64,
    #[serde(default)]
    pub adult: bool,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<u64>,
}

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Person {
    pub id: u64,
    #[serde(default)]
    pub adult: bool,
    pub name: Option<String>,
    pub biography: Option<String>,
    pub homepage: Option<String>,
    pub profile_path: Option<String>,
    pub known_for_department: Option<String>,
    pub credits: Option<Credits>,
    pub images: Option<Images>,
    pub tagged_images: Option<TaggedImages>,
}

// ---------------------------------------------------------------------------
// Watch providers and regions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProviderDetails {
    pub provider_id: u64,
    pub provider_name: String,
    pub logo_path: Option<String>,
    pub display_priority: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<ProviderDetails>,
}

/// Where a title can be watched within one country.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CountryWatchProvider {
    pub link: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rent: Vec<ProviderDetails>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub buy: Vec<ProviderDetails>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flatrate: Vec<ProviderDetails>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ads: Vec<ProviderDetails>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub free: Vec<ProviderDetails>,
}

/// Per-country availability for one movie, keyed by ISO 3166-1 code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchProviderResponse {
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: BTreeMap<String, CountryWatchProvider>,
}

impl WatchProviderResponse {
    /// Keep only the entry whose country code matches `region`, ignoring case.
    pub fn for_region(self, region: &str) -> BTreeMap<String, CountryWatchProvider> {
        self.results
            .into_iter()
            .filter(|(country, _)| country.eq_ignore_ascii_case(region))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Region {
    pub iso_3166_1: String,
    pub english_name: Option<String>,
    pub native_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Region>,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Combined movie and people search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SearchMultiResult {
    pub movies: Vec<Movie>,
    pub people: Vec<Person>,
}
