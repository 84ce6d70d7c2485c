//! HTTP backend implementation

use async_trait::async_trait;
use reqwest::Url;

use crate::api::{ApiRequest, GameApi, Method};
use crate::config::ApiConfig;
use crate::error::{AideError, ApiError, ConfigError, Result};

/// Longest slice of an error body kept in `ApiError::Status`
const MAX_ERROR_BODY: usize = 512;

/// Game API over HTTP with form-encoded request bodies and JSON responses
pub struct HttpApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpApi {
    /// Create a client for the configured backend
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the base URL does not parse, and
    /// `AideError::Runtime` if the TLS backend cannot be initialised.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base = parse_base_url(&config.base_url)?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("pokeraide/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AideError::Runtime(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build the HTTP request for an API call without sending it
    pub fn build_request(&self, request: &ApiRequest) -> std::result::Result<reqwest::Request, ApiError> {
        let url = self
            .base
            .join(&request.path())
            .map_err(|e| ApiError::InvalidUrl {
                message: e.to_string(),
            })?;

        let method = match request.method() {
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, url);
        let form = request.form();
        if !form.is_empty() {
            builder = builder.form(&form);
        }

        builder.build().map_err(|e| ApiError::network(e.to_string()))
    }
}

#[async_trait]
impl GameApi for HttpApi {
    async fn send(&self, request: &ApiRequest) -> std::result::Result<serde_json::Value, ApiError> {
        let http_request = self.build_request(request)?;
        tracing::debug!(method = %http_request.method(), url = %http_request.url(), "Sending request");

        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        serde_json::from_slice(&body).map_err(|e| ApiError::decode(e.to_string()))
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Parse the base URL, making sure relative paths join below it
///
/// `http://host/api` and `http://host/api/` both resolve `game` to
/// `http://host/api/game`.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    let url = Url::parse(&with_slash).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        }
        .into());
    }

    Ok(url)
}
