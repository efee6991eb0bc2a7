//! Discover request parameters.

use serde::{Deserialize, Serialize};

/// Result ordering for the discover listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Upstream default ordering; no `sort_by` parameter is sent.
    #[default]
    None,
    Popularity,
    ReleaseDate,
    PrimaryReleaseDate,
    Rating,
    VoteCount,
}

impl SortOrder {
    /// Upstream `sort_by` value, if any.
    pub fn sort_by(self) -> Option<&'static str> {
        match self {
            SortOrder::None => None,
            SortOrder::Popularity => Some("popularity.desc"),
            SortOrder::ReleaseDate => Some("release_date.desc"),
            SortOrder::PrimaryReleaseDate => Some("primary_release_date.desc"),
            SortOrder::Rating => Some("vote_average.desc"),
            SortOrder::VoteCount => Some("vote_count.desc"),
        }
    }
}

/// Body of a discover request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct DiscoverFilter {
    /// 1-based page number; `0` leaves the choice to the upstream.
    pub page: u32,
    pub sort: SortOrder,
}

impl DiscoverFilter {
    /// Extra query parameters for the discover URL.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if self.page > 0 {
            pairs.push(("page", self.page.to_string()));
        }
        if let Some(sort_by) = self.sort.sort_by() {
            pairs.push(("sort_by", sort_by.to_string()));
        }
        pairs
    }
}
