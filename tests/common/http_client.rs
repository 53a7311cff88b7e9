//! HTTP client helpers for tests.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
const SHADER_STATUS_HEADER: &str = "x-shader-status";

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    /// `POST /save` with `{"source": source}`; returns the issued id.
    pub async fn save(&self, source: &str) -> Result<String, TestClientError> {
        let body = serde_json::json!({ "source": source });
        let resp = self
            .client
            .post(self.url("/save"))
            .json(&body)
            .send()
            .await?;

        match resp.status().as_u16() {
            200 => Ok(resp.json::<SaveResponse>().await?.id),
            status => Err(Self::error_from(status, resp).await),
        }
    }

    /// `POST /save` with an arbitrary JSON body.
    pub async fn save_raw(&self, body: &serde_json::Value) -> Result<String, TestClientError> {
        let resp = self
            .client
            .post(self.url("/save"))
            .json(body)
            .send()
            .await?;

        match resp.status().as_u16() {
            200 => Ok(resp.json::<SaveResponse>().await?.id),
            status => Err(Self::error_from(status, resp).await),
        }
    }

    /// `GET /shader/{id}`; returns the record and the `X-Shader-Status` header.
    pub async fn shader(&self, id: &str) -> Result<(ShaderBody, String), TestClientError> {
        let resp = self
            .client
            .get(self.url(&format!("/shader/{}", id)))
            .send()
            .await?;

        let status_header = resp
            .headers()
            .get(SHADER_STATUS_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        match resp.status().as_u16() {
            200 => Ok((resp.json().await?, status_header)),
            status => Err(Self::error_from(status, resp).await),
        }
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    pub async fn ready(&self) -> Result<ReadyResponse, TestClientError> {
        let resp = self.client.get(self.url("/ready")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    async fn error_from(status: u16, resp: reqwest::Response) -> TestClientError {
        let body = resp.text().await.unwrap_or_default();
        match (status, serde_json::from_str::<ErrorBody>(&body)) {
            (400, Ok(err)) => TestClientError::BadRequest(err.error),
            (404, Ok(err)) => TestClientError::NotFound(err.error),
            _ => TestClientError::UnexpectedStatus(status, body),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SaveResponse {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShaderBody {
    pub source: String,
    pub created: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ComponentStatus {
    pub http: String,
    pub cache: String,
    pub storage: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub components: ComponentStatus,
}

impl ReadyResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),
}
