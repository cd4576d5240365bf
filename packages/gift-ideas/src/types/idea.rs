//! Validated gift ideas and idea sets.

use serde::Serialize;

/// Upper bound on ideas returned from one retrieval.
pub const MAX_IDEAS: usize = 6;

/// A gift idea that passed validation.
///
/// Title and reason are trimmed and non-empty; keywords are a non-empty list
/// of trimmed, non-empty strings. The only way to build one is [`GiftIdea::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GiftIdea {
    title: String,
    reason: String,
    keywords: Vec<String>,
}

impl GiftIdea {
    /// Returns `None` if any field is blank or there are no keywords.
    pub fn new(
        title: impl AsRef<str>,
        reason: impl AsRef<str>,
        keywords: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Option<Self> {
        let title = title.as_ref().trim();
        let reason = reason.as_ref().trim();
        if title.is_empty() || reason.is_empty() {
            return None;
        }

        let mut cleaned = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            if keyword.is_empty() {
                return None;
            }
            cleaned.push(keyword.to_string());
        }
        if cleaned.is_empty() {
            return None;
        }

        Some(Self {
            title: title.to_string(),
            reason: reason.to_string(),
            keywords: cleaned,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// Why retrieval gave up on live generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    /// Every attempt failed; carries the last failure.
    Exhausted { last_failure: String },
    /// The provider refused on content-safety grounds.
    SafetyBlocked { reason: String },
    /// The provider is not configured (e.g. missing API key).
    Unconfigured { message: String },
}

/// Where an [`IdeaSet`] came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum IdeaSource {
    Generated { attempts: u32 },
    Fallback { attempts: u32, reason: FallbackReason },
}

impl IdeaSource {
    pub fn attempts(&self) -> u32 {
        match self {
            IdeaSource::Generated { attempts } | IdeaSource::Fallback { attempts, .. } => *attempts,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, IdeaSource::Fallback { .. })
    }
}

/// Result of idea retrieval. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdeaSet {
    pub ideas: Vec<GiftIdea>,
    pub source: IdeaSource,
}
