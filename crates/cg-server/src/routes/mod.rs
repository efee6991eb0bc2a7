//! Route handlers for the HTTP API.

pub mod cache;
pub mod health;
pub mod metrics;
pub mod tmdb;

use serde::Serialize;

/// Success envelope: `{ "data": ... }`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
