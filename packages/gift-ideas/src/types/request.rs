//! Caller input: free-text query plus optional structured context.

use serde::{Deserialize, Serialize};

use crate::error::{GiftError, Result};

pub const MAX_QUERY_CHARS: usize = 500;
pub const MAX_CONTEXT_FIELD_CHARS: usize = 50;
pub const MAX_INTERESTS: usize = 20;

/// Structured preferences collected by the chat flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftContext {
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl GiftContext {
    pub fn is_empty(&self) -> bool {
        self.recipient.is_none()
            && self.occasion.is_none()
            && self.budget.is_none()
            && self.interests.is_empty()
    }

    /// Trim, bound, and strip angle brackets from every field.
    fn sanitized(self) -> Result<Self> {
        if self.interests.len() > MAX_INTERESTS {
            return Err(GiftError::invalid(format!(
                "too many interests (max {})",
                MAX_INTERESTS
            )));
        }

        Ok(Self {
            recipient: sanitize_field(self.recipient),
            occasion: sanitize_field(self.occasion),
            budget: sanitize_field(self.budget),
            interests: self
                .interests
                .iter()
                .map(|i| sanitize(i, MAX_CONTEXT_FIELD_CHARS))
                .filter(|i| !i.is_empty())
                .collect(),
        })
    }
}

/// A validated request for gift ideas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GiftRequest {
    pub query: String,
    pub context: GiftContext,
}

impl GiftRequest {
    /// Validate and sanitize caller input.
    ///
    /// The query may be blank only when the context names a recipient or an
    /// occasion.
    pub fn new(query: impl Into<String>, context: GiftContext) -> Result<Self> {
        let query = query.into();
        let query = query.trim();

        if query.chars().count() > MAX_QUERY_CHARS {
            return Err(GiftError::invalid(format!(
                "query too long (max {} characters)",
                MAX_QUERY_CHARS
            )));
        }

        let context = context.sanitized()?;
        if query.is_empty() && context.recipient.is_none() && context.occasion.is_none() {
            return Err(GiftError::invalid(
                "must provide either a query or gift details (recipient, occasion)",
            ));
        }

        Ok(Self {
            query: query.to_string(),
            context,
        })
    }

    pub fn from_query(query: impl Into<String>) -> Result<Self> {
        Self::new(query, GiftContext::default())
    }
}

fn sanitize_field(value: Option<String>) -> Option<String> {
    value
        .map(|v| sanitize(&v, MAX_CONTEXT_FIELD_CHARS))
        .filter(|v| !v.is_empty())
}

/// Trim, cap at `max_chars`, and drop `<` / `>`.
pub fn sanitize(input: &str, max_chars: usize) -> String {
    input
        .trim()
        .chars()
        .take(max_chars)
        .filter(|c| *c != '<' && *c != '>')
        .collect::<String>()
        .trim()
        .to_string()
}
