//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift.

use std::time::Duration;

/// Cache-tier lifetime for a record, refreshed on every cache write.
pub const CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;
pub const CACHE_TTL: Duration = Duration::from_secs(CACHE_TTL_SECS);

/// Prefix applied to every cache-tier key (`shader:{id}`).
pub const CACHE_KEY_PREFIX: &str = "shader";

/// Random bytes drawn per identifier.
pub const ID_BYTES: usize = 4;
/// Length of an encoded identifier (unpadded base64 of [`ID_BYTES`]).
pub const ID_LEN: usize = (ID_BYTES * 4).div_ceil(3);

/// Attempts [`crate::cache::TieredStore::save`] makes to find an unused identifier.
pub const MAX_ID_ATTEMPTS: usize = 8;

/// Maximum accepted request body.
pub const MAX_BODY_BYTES: usize = 100 * 1024;

/// Builds the cache-tier key for an identifier.
#[inline]
pub fn cache_key(id: &str) -> String {
    format!("{}:{}", CACHE_KEY_PREFIX, id)
}
