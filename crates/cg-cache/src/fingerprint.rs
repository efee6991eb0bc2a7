//! Cache key derivation.

use sha2::{Digest, Sha256};

/// Length in characters of every key produced by [`fingerprint`].
pub const FINGERPRINT_LEN: usize = 64;

/// Map a normalized request URL to a cache key.
///
/// The key is the lowercase hex SHA-256 of the URL bytes: a pure function of
/// the input, fixed width, and safe to use as a file name or identifier.
pub fn fingerprint(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}
