//! Request extractors for locale and correlation id.
//!
//! Neither extractor rejects: a missing or malformed hint falls back to the
//! configured locale or a freshly generated id.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;
use serde::Deserialize;

use cg_core::{CorrelationId, Locale};

use crate::context::AppContext;
use crate::middleware::correlation::X_CORRELATION_ID;

/// `?lang=` query parameter accepted by every metadata route.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LangQuery {
    /// Explicit language tag, e.g. `fr-FR`. Overrides `Accept-Language`.
    pub lang: Option<String>,
}

/// Locale resolved from `?lang=` and `Accept-Language`.
#[derive(Debug, Clone)]
pub struct ClientLocale(pub Locale);

impl FromRequestParts<AppContext> for ClientLocale {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppContext) -> Result<Self, Self::Rejection> {
        let lang = Query::<LangQuery>::try_from_uri(&parts.uri)
            .map(|Query(q)| q.lang)
            .unwrap_or_default();
        let accept = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());

        Ok(Self(Locale::resolve_with(
            lang.as_deref(),
            accept,
            &state.config.locale,
        )))
    }
}

/// The request's correlation id.
///
/// Taken from the extensions populated by the correlation middleware, else
/// from the header, else generated.
#[derive(Debug, Clone)]
pub struct Correlation(pub CorrelationId);

impl<S> FromRequestParts<S> for Correlation
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<CorrelationId>() {
            return Ok(Self(id.clone()));
        }
        let header = parts
            .headers
            .get(&X_CORRELATION_ID)
            .and_then(|v| v.to_str().ok());
        Ok(Self(CorrelationId::from_header(header)))
    }
}
