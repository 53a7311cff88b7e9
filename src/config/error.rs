//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Request timeout was zero or not a number.
    #[error("invalid request timeout '{value}': must be a positive number of seconds")]
    InvalidTimeout { value: String },

    /// Unknown cache write policy.
    #[error("invalid cache write policy '{value}': expected 'strict' or 'degrade'")]
    InvalidCachePolicy { value: String },

    /// Cache URL uses a scheme we cannot connect to.
    #[error("unsupported cache url '{value}': expected redis://, rediss:// or memory://")]
    UnsupportedCacheUrl { value: String },

    /// Path exists but is a directory (when a file was expected).
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },
}
