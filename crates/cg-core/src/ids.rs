//! Request-scoped identifiers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque token propagated across every outbound call made on behalf of one
/// inbound request.
///
/// The boundary layer normally supplies it (from the `x-correlation-id`
/// header); [`CorrelationId::default`] generates a fresh UUIDv4 so callers
/// that have none still get a usable value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a new random correlation ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Use the supplied header value when it is non-blank, otherwise generate
    /// a new ID.
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Self(v.to_string()),
            _ => Self::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CorrelationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid.to_string())
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_uuids() {
        let id = CorrelationId::new();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
        assert_ne!(id, CorrelationId::new());
    }

    #[test]
    fn header_value_is_kept() {
        let id = CorrelationId::from_header(Some("  trace-abc  "));
        assert_eq!(id.as_str(), "trace-abc");
    }

    #[test]
    fn blank_header_generates() {
        let id = CorrelationId::from_header(Some("   "));
        assert!(Uuid::parse_str(id.as_str()).is_ok());
        let id = CorrelationId::from_header(None);
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn serde_transparent() {
        let id = CorrelationId::from_header(Some("abc"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
