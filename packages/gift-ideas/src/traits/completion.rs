//! Completion provider trait.

use async_trait::async_trait;
use gemini_client::{GeminiClient, GeminiError, GenerateContentRequest};
use thiserror::Error;

/// Sampling settings used for idea generation.
const TEMPERATURE: f32 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 2048;

/// What the model returned for a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Free text; may be empty.
    Text(String),
    /// Withheld by the provider's safety filter.
    Blocked { reason: String },
}

/// Failure to obtain a completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("rate limited by provider")]
    RateLimited,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("provider error: {0}")]
    Api(String),

    #[error("provider not configured: {0}")]
    Unconfigured(String),
}

/// A generative model that turns a prompt into text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Completion, ProviderError>;
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<Completion, ProviderError> {
        let request = GenerateContentRequest::prompt(prompt)
            .temperature(TEMPERATURE)
            .max_output_tokens(MAX_OUTPUT_TOKENS);

        let response = self.generate_content(request).await.map_err(ProviderError::from)?;

        if let Some(reason) = response.block_reason() {
            return Ok(Completion::Blocked {
                reason: reason.to_string(),
            });
        }

        Ok(Completion::Text(response.text().unwrap_or_default()))
    }
}

impl From<GeminiError> for ProviderError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::RateLimited(_) => ProviderError::RateLimited,
            GeminiError::Network(message) => ProviderError::Transport(message),
            GeminiError::Config(message) => ProviderError::Unconfigured(message),
            GeminiError::Api { status, message } => {
                ProviderError::Api(format!("status {}: {}", status, message))
            }
            GeminiError::Parse(message) => ProviderError::Api(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_error_mapping() {
        assert_eq!(
            ProviderError::from(GeminiError::RateLimited("quota".into())),
            ProviderError::RateLimited
        );
        assert_eq!(
            ProviderError::from(GeminiError::Network("reset".into())),
            ProviderError::Transport("reset".into())
        );
        assert!(matches!(
            ProviderError::from(GeminiError::Config("no key".into())),
            ProviderError::Unconfigured(_)
        ));
        assert!(matches!(
            ProviderError::from(GeminiError::Api { status: 500, message: "boom".into() }),
            ProviderError::Api(m) if m.contains("500")
        ));
    }
}
