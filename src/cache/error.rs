use thiserror::Error;

use crate::ident::IdError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
/// Errors returned by a cache tier.
pub enum CacheError {
    /// Redis command or connection failure.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The cache tier could not serve the request.
    #[error("cache unavailable: {reason}")]
    Unavailable {
        /// Error message.
        reason: String,
    },
}

/// Convenience result type for cache-tier operations.
pub type CacheResult<T> = Result<T, CacheError>;

#[derive(Debug, Error)]
/// Errors returned by [`super::TieredStore`].
pub enum StoreError {
    /// Empty shader source. Rejected before either tier is touched.
    #[error("shader source is empty")]
    EmptySource,

    /// Identifier generation failed.
    #[error("identifier generation failed: {0}")]
    Id(#[from] IdError),

    /// Cache-tier write failed under the strict write policy.
    #[error("cache tier error: {0}")]
    Cache(#[from] CacheError),

    /// Durable-tier write failed; nothing was stored.
    #[error("durable tier error: {0}")]
    Storage(#[from] StorageError),

    /// Record could not be serialized for the cache tier.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Every generated identifier was already taken.
    #[error("no unused identifier after {attempts} attempts")]
    IdSpaceExhausted {
        /// Attempts made.
        attempts: usize,
    },
}

/// Convenience result type for tiered-store operations.
pub type StoreResult<T> = Result<T, StoreError>;
