//! Best-effort repair of model completions into JSON.
//!
//! Models asked for "pure JSON" still wrap it in code fences, add a sentence
//! of prose, leave trailing commas, or forget to quote keys. [`repair`] fixes
//! those cases textually; it is not a JSON5 parser. If the result still does
//! not parse, [`parse_completion`] reports it and the caller decides whether
//! to retry.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_+-]*[ \t]*\r?\n?").unwrap());

/// First `[` opening an array of objects through the last `]` closing one.
static OBJECT_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[\s*\{.*\}\s*,?\s*\]").unwrap());

/// Why a completion could not be turned into JSON.
#[derive(Debug, Error)]
pub enum RepairError {
    #[error("completion is empty")]
    Empty,

    #[error("completion is not valid JSON after repair: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Repair raw completion text into candidate JSON text.
pub fn repair(raw: &str) -> String {
    let unfenced = CODE_FENCE.replace_all(raw, "");
    let trimmed = unfenced.trim();

    let candidate = OBJECT_ARRAY
        .find(trimmed)
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    fix_structure(candidate)
}

/// Repair then parse.
pub fn parse_completion(raw: &str) -> Result<Value, RepairError> {
    if raw.trim().is_empty() {
        return Err(RepairError::Empty);
    }

    let repaired = repair(raw);
    if repaired.is_empty() {
        return Err(RepairError::Empty);
    }

    Ok(serde_json::from_str(&repaired)?)
}

/// Drop trailing commas and quote bare keys, outside string literals only.
fn fix_structure(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);

    let mut in_string = false;
    let mut escaped = false;
    // Last non-whitespace char emitted outside a string.
    let mut last_structural: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
                last_structural = Some('"');
            }
            i += 1;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
                i += 1;
            }
            ',' => {
                let next = next_non_whitespace(&chars, i + 1);
                if !matches!(next, Some(']') | Some('}')) {
                    out.push(c);
                    last_structural = Some(c);
                }
                i += 1;
            }
            c if is_ident_start(c) && matches!(last_structural, Some('{') | Some(',')) => {
                let start = i;
                while i < chars.len() && is_ident_continue(chars[i]) {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                if next_non_whitespace(&chars, i) == Some(':') {
                    out.push('"');
                    out.push_str(&ident);
                    out.push('"');
                } else {
                    out.push_str(&ident);
                }
                last_structural = ident.chars().last();
            }
            c => {
                out.push(c);
                if !c.is_whitespace() {
                    last_structural = Some(c);
                }
                i += 1;
            }
        }
    }

    out
}

fn next_non_whitespace(chars: &[char], from: usize) -> Option<char> {
    chars[from.min(chars.len())..]
        .iter()
        .copied()
        .find(|c| !c.is_whitespace())
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
