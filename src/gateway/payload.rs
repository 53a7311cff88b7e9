use serde::{Deserialize, Serialize};

/// `POST /save` body. `source` is optional here so a missing field is reported as a
/// validation error rather than a JSON schema error.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SaveRequest {
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SaveResponse {
    pub id: String,
}
