use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

/// Body of `POST /generate-qr`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transparent_background: Option<bool>,
}

impl GenerateRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format: None,
            size: None,
            transparent_background: None,
        }
    }
}

/// JSON answer of `POST /generate-qr` for PNG output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub url: String,
    pub qr_code: String,
    pub format: String,
    pub size: u32,
    pub transparent_background: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
}

/// `{error, message}` body returned on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// What came back from a generate or image call.
#[derive(Debug, thiserror::Error)]
pub enum QrClientError {
    /// The service answered with an error body.
    #[error("service returned {status}: {} ({})", .body.error, .body.message)]
    Api { status: StatusCode, body: ErrorResponse },
    /// Transport or decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub struct QrClient {
    client: Client,
    base_url: String,
}

impl QrClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Check service liveness.
    pub async fn health(&self) -> Result<HealthResponse, QrClientError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Request a PNG QR code embedded as a data URI.
    pub async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, QrClientError> {
        let resp = self
            .client
            .post(format!("{}/generate-qr", self.base_url))
            .json(req)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Fetch raw image bytes from `GET /qr`.
    pub async fn image(
        &self,
        url: &str,
        format: Option<&str>,
        size: Option<u32>,
        transparent: bool,
    ) -> Result<(String, Vec<u8>), QrClientError> {
        let mut query = vec![("url", url.to_string())];
        if let Some(format) = format {
            query.push(("format", format.to_string()));
        }
        if let Some(size) = size {
            query.push(("size", size.to_string()));
        }
        if transparent {
            query.push(("transparent", "true".to_string()));
        }

        let resp = self
            .client
            .get(format!("{}/qr", self.base_url))
            .query(&query)
            .send()
            .await?;
        let resp = check(resp).await?;

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Ok((content_type, resp.bytes().await?.to_vec()))
    }
}

async fn check(resp: Response) -> Result<Response, QrClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.json::<ErrorResponse>().await?;
    Err(QrClientError::Api { status, body })
}
