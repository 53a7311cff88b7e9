use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A stored shader: the source text plus its creation time.
///
/// The same JSON shape (`{"source": .., "created": ..}`) is used in the cache tier, the
/// durable file and HTTP responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderRecord {
    /// Opaque shader source supplied by the caller.
    pub source: String,
    /// Milliseconds since the Unix epoch at write time.
    pub created: i64,
}

impl ShaderRecord {
    /// Creates a record stamped with the current time.
    pub fn new(source: impl Into<String>) -> Self {
        Self::with_created(source, Utc::now().timestamp_millis())
    }

    /// Creates a record with an explicit timestamp.
    pub fn with_created(source: impl Into<String>, created: i64) -> Self {
        Self {
            source: source.into(),
            created,
        }
    }

    /// Serializes to the wire/cache JSON form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parses the wire/cache JSON form.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
