//! Typed errors for the gift ideas library.
//!
//! Only configuration and request-validation problems cross the public API.
//! Provider failures are absorbed: idea retrieval falls back to a static set
//! and product search degrades to an empty list.

use thiserror::Error;

/// Errors returned to callers of the library.
#[derive(Debug, Error)]
pub enum GiftError {
    /// The system cannot function (e.g. missing signing credentials)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The caller's request failed validation
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },
}

impl GiftError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        GiftError::InvalidRequest {
            reason: reason.into(),
        }
    }
}

/// Result type alias for gift idea operations.
pub type Result<T> = std::result::Result<T, GiftError>;
