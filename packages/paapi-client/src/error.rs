//! Error types for the PA-API client.

use thiserror::Error;

use crate::types::ApiErrorDetail;

/// Result type for PA-API client operations.
pub type Result<T> = std::result::Result<T, PaapiError>;

/// Request signing errors.
#[derive(Debug, Error)]
pub enum SigningError {
    /// One or more credential fields are blank. Never sign with empty strings.
    #[error("missing signing credential fields: {0}")]
    MissingCredential(String),
}

/// PA-API client errors.
#[derive(Debug, Error)]
pub enum PaapiError {
    /// Configuration error (missing credentials, partner tag)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response without a parseable error envelope
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Explicit `Errors` envelope returned by the provider
    #[error("Request rejected: {}", format_details(.0))]
    Rejected(Vec<ApiErrorDetail>),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<SigningError> for PaapiError {
    fn from(err: SigningError) -> Self {
        PaapiError::Config(err.to_string())
    }
}

impl PaapiError {
    /// Whether this error means the client cannot work at all.
    pub fn is_configuration(&self) -> bool {
        matches!(self, PaapiError::Config(_))
    }
}

fn format_details(details: &[ApiErrorDetail]) -> String {
    details
        .iter()
        .map(|d| format!("{}: {}", d.code, d.message))
        .collect::<Vec<_>>()
        .join("; ")
}
