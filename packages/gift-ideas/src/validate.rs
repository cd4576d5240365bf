//! Structural validation of parsed idea records.

use serde_json::Value;

use crate::types::GiftIdea;

/// Keep the well-formed ideas from a parsed completion.
///
/// Anything other than an array yields no ideas. Elements that fail
/// validation are dropped without being reported individually.
pub fn validate_ideas(value: &Value) -> Vec<GiftIdea> {
    let Some(items) = value.as_array() else {
        tracing::debug!(kind = value_kind(value), "Completion is not an array");
        return Vec::new();
    };

    let ideas: Vec<GiftIdea> = items.iter().filter_map(validate_idea).collect();

    if ideas.len() < items.len() {
        tracing::debug!(
            received = items.len(),
            accepted = ideas.len(),
            "Dropped malformed ideas"
        );
    }

    ideas
}

/// Validate one record: string title and reason with content, and a non-empty
/// keyword array made only of non-blank strings.
pub fn validate_idea(value: &Value) -> Option<GiftIdea> {
    let title = value.get("title")?.as_str()?;
    let reason = value.get("reason")?.as_str()?;
    let keywords = value
        .get("keywords")?
        .as_array()?
        .iter()
        .map(Value::as_str)
        .collect::<Option<Vec<&str>>>()?;

    GiftIdea::new(title, reason, keywords)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drops_idea_missing_keywords() {
        let value = json!([
            {"title": "Golf Rangefinder", "reason": "Judge distances", "keywords": ["golf rangefinder"]},
            {"title": "Mystery Box", "reason": "Surprise"}
        ]);

        let ideas = validate_ideas(&value);
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].title(), "Golf Rangefinder");
    }

    #[test]
    fn test_non_array_yields_nothing() {
        assert!(validate_ideas(&json!({"title": "A", "reason": "B", "keywords": ["c"]})).is_empty());
        assert!(validate_ideas(&json!("ideas")).is_empty());
        assert!(validate_ideas(&Value::Null).is_empty());
    }

    #[test]
    fn test_rejects_wrong_field_types() {
        let value = json!([
            {"title": 42, "reason": "B", "keywords": ["c"]},
            {"title": "A", "reason": ["B"], "keywords": ["c"]},
            {"title": "A", "reason": "B", "keywords": "c"},
            {"title": "A", "reason": "B", "keywords": ["c", 7]},
            {"title": "A", "reason": "B", "keywords": []},
            {"title": "   ", "reason": "B", "keywords": ["c"]},
            "not an object"
        ]);
        assert!(validate_ideas(&value).is_empty());
    }

    #[test]
    fn test_preserves_order_and_extra_fields_ignored() {
        let value = json!([
            {"title": "First", "reason": "r1", "keywords": ["one"], "price": "£20"},
            {"title": "Second", "reason": "r2", "keywords": ["two", "deux"]}
        ]);
        let ideas = validate_ideas(&value);
        assert_eq!(ideas.iter().map(|i| i.title()).collect::<Vec<_>>(), vec!["First", "Second"]);
        assert_eq!(ideas[1].keywords(), ["two", "deux"]);
    }
}
