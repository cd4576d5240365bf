//! Prompt construction for idea generation.

use crate::types::GiftRequest;

const DEFAULT_RECIPIENT: &str = "someone special";
const DEFAULT_OCCASION: &str = "general gift";
const DEFAULT_BUDGET: &str = "flexible";
const DEFAULT_INTERESTS: &str = "various";

/// Build the generation prompt for a request.
///
/// A non-empty query is used verbatim; otherwise the structured context is
/// listed with defaults for whatever is missing. Every prompt ends with the
/// JSON array format the repair step expects.
pub fn build_prompt(request: &GiftRequest, max_ideas: usize) -> String {
    let mut prompt = if request.query.is_empty() {
        let context = &request.context;
        let interests = if context.interests.is_empty() {
            DEFAULT_INTERESTS.to_string()
        } else {
            context.interests.join(", ")
        };

        format!(
            "Generate {count} thoughtful gift suggestions for:\n\
             - Recipient: {recipient}\n\
             - Occasion: {occasion}\n\
             - Budget: {budget}\n\
             - Interests: {interests}\n\n\
             Each suggestion should include a title, the reason it makes a good gift, \
             and search keywords for finding it on Amazon UK.",
            count = max_ideas,
            recipient = context.recipient.as_deref().unwrap_or(DEFAULT_RECIPIENT),
            occasion = context.occasion.as_deref().unwrap_or(DEFAULT_OCCASION),
            budget = context.budget.as_deref().unwrap_or(DEFAULT_BUDGET),
            interests = interests,
        )
    } else {
        format!(
            "Generate {count} thoughtful gift suggestions for: \"{query}\". \
             Each suggestion should include a title, the reason it makes a good gift, \
             and search keywords for finding it on Amazon UK.",
            count = max_ideas,
            query = request.query,
        )
    };

    prompt.push_str(FORMAT_INSTRUCTIONS);
    prompt
}

const FORMAT_INSTRUCTIONS: &str = r#"

Respond with a JSON array only. No markdown, no code fences, no commentary.
Use exactly this shape:
[
  {
    "title": "Gift idea name",
    "reason": "Why this is a great gift",
    "keywords": ["keyword one", "keyword two"]
  }
]"#;
