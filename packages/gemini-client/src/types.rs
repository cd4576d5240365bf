//! Gemini `generateContent` request and response types.

use serde::{Deserialize, Serialize};

// =============================================================================
// Request
// =============================================================================

/// `generateContent` request body.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Single-turn request with one text prompt.
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::user(text)],
            generation_config: None,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.generation_config
            .get_or_insert_with(GenerationConfig::default)
            .temperature = Some(temperature);
        self
    }

    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.generation_config
            .get_or_insert_with(GenerationConfig::default)
            .max_output_tokens = Some(max_output_tokens);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

// =============================================================================
// Response
// =============================================================================

/// Finish reasons that mean the candidate was withheld by a safety filter.
const SAFETY_FINISH_REASONS: [&str; 4] = ["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    pub prompt_feedback: Option<PromptFeedback>,

    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated. `None` when blank.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Why the prompt or the first candidate was blocked, if it was.
    pub fn block_reason(&self) -> Option<&str> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Some(reason);
        }

        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .filter(|reason| SAFETY_FINISH_REASONS.contains(reason))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
    pub total_token_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = GenerateContentRequest::prompt("ideas please")
            .temperature(0.7)
            .max_output_tokens(2048);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["parts"][0]["text"], "ideas please");
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 2048);
        assert!(value["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_text_concatenates_parts() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"[{\"a\""},{"text":":1}]"}]},"finishReason":"STOP"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text().as_deref(), Some(r#"[{"a":1}]"#));
        assert_eq!(response.block_reason(), None);
    }

    #[test]
    fn test_prompt_block_detected() {
        let raw = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text(), None);
        assert_eq!(response.block_reason(), Some("SAFETY"));
    }

    #[test]
    fn test_candidate_safety_finish_detected() {
        let raw = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.block_reason(), Some("SAFETY"));

        let raw = r#"{"candidates":[{"content":{"parts":[]},"finishReason":"MAX_TOKENS"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.block_reason(), None);
        assert_eq!(response.text(), None);
    }
}
