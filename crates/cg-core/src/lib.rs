//! cg-core: shared error type, configuration, locale resolution and
//! correlation identifiers.
//!
//! This crate is the foundational dependency for all other cg-* crates. It
//! has no I/O of its own.

pub mod config;
pub mod error;
pub mod ids;
pub mod locale;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::CorrelationId;
pub use locale::Locale;
