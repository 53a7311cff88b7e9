use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
/// Errors returned by the durable tier.
pub enum StorageError {
    /// IO error while reading or rewriting the store file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The in-memory map could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store file exists but does not hold a JSON object of records.
    #[error("durable store at {path} is corrupt: {source}")]
    Corrupt {
        /// Store file path.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// A blocking file task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    TaskFailed(String),
}

/// Convenience result type for durable-tier operations.
pub type StorageResult<T> = Result<T, StorageError>;
