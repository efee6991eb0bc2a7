//! Unified error type for cinegate.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for the HTTP layer to derive a status code via [`Error::http_status`] and to
//! tell a missing upstream resource apart from a generic failure.

/// Unified error type covering all failure modes in cinegate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The upstream provider answered 404 for the requested resource.
    #[error("Upstream resource not found: {resource}")]
    UpstreamNotFound {
        /// Path of the upstream resource (never includes the query string).
        resource: String,
    },

    /// The upstream provider could not be reached or returned a non-success
    /// status other than 404.
    #[error("Upstream unavailable{}: {message}", status_suffix(.status))]
    UpstreamUnavailable {
        /// HTTP status returned by the upstream, if a response was received.
        status: Option<u16>,
        /// Human-readable error description.
        message: String,
    },

    /// The upstream payload did not match the expected shape.
    #[error("Failed to decode upstream payload into {target}: {message}")]
    Decode {
        /// Name of the type the payload was decoded into.
        target: &'static str,
        /// Decoder error description.
        message: String,
    },

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::UpstreamNotFound { .. } => 404,
            Error::UpstreamUnavailable { .. } => 502,
            Error::Decode { .. } => 502,
            Error::Validation(_) => 400,
            Error::Config(_) => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Returns `true` for [`Error::UpstreamNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::UpstreamNotFound { .. })
    }

    /// Status code reported by the upstream, when one is known.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Error::UpstreamNotFound { .. } => Some(404),
            Error::UpstreamUnavailable { status, .. } => *status,
            _ => None,
        }
    }

    /// Convenience constructor for [`Error::UpstreamNotFound`].
    pub fn upstream_not_found(resource: impl Into<String>) -> Self {
        Error::UpstreamNotFound {
            resource: resource.into(),
        }
    }

    /// Convenience constructor for [`Error::UpstreamUnavailable`].
    pub fn upstream_unavailable(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::UpstreamUnavailable {
            status,
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Decode`].
    pub fn decode(target: &'static str, message: impl Into<String>) -> Self {
        Error::Decode {
            target,
            message: message.into(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = Error::upstream_not_found("/3/movie/42");
        assert_eq!(err.to_string(), "Upstream resource not found: /3/movie/42");
        assert_eq!(err.http_status(), 404);
        assert!(err.is_not_found());
        assert_eq!(err.upstream_status(), Some(404));
    }

    #[test]
    fn unavailable_with_status_display() {
        let err = Error::upstream_unavailable(Some(503), "service unavailable");
        assert_eq!(err.to_string(), "Upstream unavailable (503): service unavailable");
        assert_eq!(err.http_status(), 502);
        assert_eq!(err.upstream_status(), Some(503));
    }

    #[test]
    fn unavailable_without_status_display() {
        let err = Error::upstream_unavailable(None, "connection refused");
        assert_eq!(err.to_string(), "Upstream unavailable: connection refused");
        assert!(!err.is_not_found());
        assert_eq!(err.upstream_status(), None);
    }

    #[test]
    fn decode_display() {
        let err = Error::decode("Movie", "missing field `id`");
        assert_eq!(
            err.to_string(),
            "Failed to decode upstream payload into Movie: missing field `id`"
        );
        assert_eq!(err.http_status(), 502);
    }

    #[test]
    fn validation_display() {
        let err = Error::Validation("query is required".into());
        assert_eq!(err.to_string(), "Validation error: query is required");
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn internal_display() {
        let err = Error::Internal("unexpected state".into());
        assert_eq!(err.to_string(), "Internal error: unexpected state");
        assert_eq!(err.http_status(), 500);
    }
}
