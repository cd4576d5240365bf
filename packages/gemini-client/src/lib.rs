//! Pure Gemini REST API client
//!
//! A minimal client for the Gemini `generateContent` endpoint with no
//! domain-specific logic. Rate limiting is reported as its own error variant
//! and safety blocks are exposed on the response, so callers can decide what
//! to retry.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemini_client::{GeminiClient, GenerateContentRequest};
//!
//! let client = GeminiClient::from_env()?.with_model("gemini-1.5-flash");
//!
//! let response = client
//!     .generate_content(GenerateContentRequest::prompt("Hello!").temperature(0.7))
//!     .await?;
//!
//! if let Some(reason) = response.block_reason() {
//!     println!("blocked: {reason}");
//! } else {
//!     println!("{}", response.text().unwrap_or_default());
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{GeminiError, Result};
pub use types::*;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Pure Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create from environment variable `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::Config("GEMINI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set the model used by [`generate_content`](Self::generate_content).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for proxies, test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Use a preconfigured HTTP client (timeouts, connection pool).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Generate content.
    ///
    /// HTTP 429 maps to [`GeminiError::RateLimited`]. A safety block is not an
    /// error: check [`GenerateContentResponse::block_reason`].
    pub async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        if self.api_key.trim().is_empty() {
            return Err(GeminiError::Config("Gemini API key is empty".into()));
        }

        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini request failed");
                GeminiError::Network(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, "Gemini rate limited");
            return Err(GeminiError::RateLimited(error_text));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Gemini API error");
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        debug!(
            model = %self.model,
            candidates = body.candidates.len(),
            total_tokens = ?body.usage_metadata.as_ref().and_then(|u| u.total_token_count),
            duration_ms = start.elapsed().as_millis(),
            "Gemini generateContent"
        );

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = GeminiClient::new("test-key")
            .with_model("gemini-1.5-pro")
            .with_base_url("https://custom.api.com/v1beta");

        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.model(), "gemini-1.5-pro");
        assert_eq!(
            client.endpoint(),
            "https://custom.api.com/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn test_default_model() {
        let client = GeminiClient::new("test-key");
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert!(client.base_url().starts_with("https://generativelanguage.googleapis.com"));
    }

    #[test]
    fn test_empty_key_fails_before_request() {
        let client = GeminiClient::new("  ").with_base_url("http://127.0.0.1:9");
        let result = tokio_test::block_on(client.generate_content(GenerateContentRequest::prompt("hi")));
        let err = tokio_test::assert_err!(result);
        assert!(matches!(err, GeminiError::Config(_)));
    }
}
