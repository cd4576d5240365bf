//! Keyword selection, category hints, and result filtering.
//!
//! The weights and thresholds here are empirical. They are kept as named
//! constants so they can be tuned without touching the logic.

use std::collections::HashSet;

pub const PERSONALIZED_TERMS: [&str; 3] = ["personalized", "personalised", "custom"];
pub const PERSONALIZED_BONUS: i32 = 3;

pub const PREMIUM_TERMS: [&str; 2] = ["premium", "luxury"];
pub const PREMIUM_BONUS: i32 = 2;

pub const BUNDLE_TERMS: [&str; 2] = ["set", "kit"];
pub const BUNDLE_BONUS: i32 = 2;

pub const GENERIC_TERMS: [&str; 1] = ["gift"];
pub const GENERIC_PENALTY: i32 = -1;

pub const CONCISE_WORD_RANGE: std::ops::RangeInclusive<usize> = 2..=4;
pub const CONCISE_BONUS: i32 = 2;

pub const VERBOSE_WORD_LIMIT: usize = 5;
pub const VERBOSE_PENALTY: i32 = -1;

/// Words shorter than this do not count toward relevance.
pub const MIN_RELEVANT_WORD_CHARS: usize = 4;

pub const MAX_TITLE_CHARS: usize = 100;
const ELLIPSIS: &str = "...";

/// Title words that mark a non-new item.
const CONDITION_WORDS: [&str; 4] = ["used", "renewed", "refurbished", "damaged"];
const CONDITION_PHRASES: [&str; 2] = ["parts only", "for parts"];

const CURRENCY_SYMBOLS: [char; 6] = ['£', '$', '€', '¥', '₹', '₩'];

/// Interest keywords mapped to PA-API search indexes. First match wins.
const CATEGORY_TABLE: &[(&[&str], &str)] = &[
    (&["golf", "sport", "fitness", "running", "cycling", "outdoor", "camping", "hiking"], "SportsAndOutdoors"),
    (&["cook", "cooking", "kitchen", "baking", "food", "coffee", "tea"], "HomeAndKitchen"),
    (&["book", "reading", "literature"], "Books"),
    (&["tech", "technology", "gadget", "electronic", "electronics", "photography"], "Electronics"),
    (&["gaming", "video game", "console"], "VideoGames"),
    (&["music", "instrument", "guitar"], "MusicalInstruments"),
    (&["beauty", "skincare", "makeup", "wellness"], "Beauty"),
    (&["fashion", "clothing", "jewellery", "jewelry"], "Fashion"),
    (&["garden", "gardening", "plant"], "Garden"),
    (&["toy", "kids", "lego"], "Toys"),
    (&["art", "craft", "crafting", "drawing", "painting"], "ArtsAndCrafts"),
];

pub const DEFAULT_CATEGORY: &str = "All";

/// Score one keyword candidate.
pub fn score_keyword(keyword: &str) -> i32 {
    let lower = keyword.to_lowercase();
    let contains_any = |terms: &[&str]| terms.iter().any(|t| lower.contains(t));

    let mut score = 0;
    if contains_any(&PERSONALIZED_TERMS) {
        score += PERSONALIZED_BONUS;
    }
    if contains_any(&PREMIUM_TERMS) {
        score += PREMIUM_BONUS;
    }
    if contains_any(&BUNDLE_TERMS) {
        score += BUNDLE_BONUS;
    }
    if contains_any(&GENERIC_TERMS) {
        score += GENERIC_PENALTY;
    }

    let words = keyword.split_whitespace().count();
    if CONCISE_WORD_RANGE.contains(&words) {
        score += CONCISE_BONUS;
    } else if words > VERBOSE_WORD_LIMIT {
        score += VERBOSE_PENALTY;
    }

    score
}

/// Pick the best keyword. Ties keep the first seen; blanks are skipped.
pub fn select_keyword(candidates: &[String]) -> Option<&str> {
    let mut best: Option<(&str, i32)> = None;
    for candidate in candidates {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            continue;
        }
        let score = score_keyword(candidate);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }
    best.map(|(keyword, _)| keyword)
}

/// Map interest hints to a search index, defaulting to `All`.
///
/// Terms match whole words (or their plural), so "art" does not fire on
/// "smart" or "party".
pub fn category_for_interests(interests: &[String]) -> &'static str {
    for interest in interests {
        let normalized = words(interest).collect::<Vec<_>>().join(" ");
        for (terms, category) in CATEGORY_TABLE {
            if terms.iter().any(|t| matches_term(&normalized, t)) {
                return *category;
            }
        }
    }
    DEFAULT_CATEGORY
}

fn matches_term(normalized: &str, term: &str) -> bool {
    contains_phrase(normalized, term) || contains_phrase(normalized, &format!("{}s", term))
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Whether the title flags a used, renewed, or damaged item.
pub fn has_condition_marker(title: &str) -> bool {
    let tokens: Vec<String> = words(title).collect();
    if tokens.iter().any(|t| CONDITION_WORDS.contains(&t.as_str())) {
        return true;
    }
    let normalized = tokens.join(" ");
    CONDITION_PHRASES
        .iter()
        .any(|phrase| contains_phrase(&normalized, phrase))
}

fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    normalized == phrase
        || normalized.starts_with(&format!("{} ", phrase))
        || normalized.ends_with(&format!(" {}", phrase))
        || normalized.contains(&format!(" {} ", phrase))
}

fn significant_words(text: &str) -> HashSet<String> {
    words(text)
        .filter(|w| w.chars().count() >= MIN_RELEVANT_WORD_CHARS)
        .collect()
}

/// Whether the title shares a significant word with the search keyword.
///
/// A keyword with no significant words places no constraint.
pub fn is_relevant(title: &str, keyword: &str) -> bool {
    let wanted = significant_words(keyword);
    if wanted.is_empty() {
        return true;
    }
    words(title).any(|w| wanted.contains(&w))
}

/// Cap a title at [`MAX_TITLE_CHARS`], ending in `...` when cut.
pub fn truncate_title(title: &str) -> String {
    let title = title.trim();
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title.to_string();
    }
    let keep = MAX_TITLE_CHARS - ELLIPSIS.len();
    let mut truncated: String = title.chars().take(keep).collect();
    truncated.truncate(truncated.trim_end().len());
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Strip currency symbols, e.g. `£24.99` → `24.99`.
pub fn normalize_price(price: &str) -> String {
    price
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_keyword_scores() {
        assert_eq!(score_keyword("gift"), -1);
        assert_eq!(score_keyword("personalized leather journal"), 5);
        assert_eq!(score_keyword("personalised photo book"), 5);
        assert_eq!(score_keyword("journal"), 0);
        assert_eq!(score_keyword("luxury golf kit"), 6);
        assert_eq!(score_keyword("a very long keyword phrase for searching"), -1);
    }

    #[test]
    fn test_selects_highest_score() {
        let candidates = strings(&["gift", "personalized leather journal", "journal"]);
        assert_eq!(select_keyword(&candidates), Some("personalized leather journal"));
    }

    #[test]
    fn test_ties_keep_first() {
        let candidates = strings(&["golf balls", "golf tees"]);
        assert_eq!(select_keyword(&candidates), Some("golf balls"));
    }

    #[test]
    fn test_select_skips_blanks() {
        assert_eq!(select_keyword(&strings(&["  ", ""])), None);
        assert_eq!(select_keyword(&[]), None);
        assert_eq!(select_keyword(&strings(&[" ", "gift"])), Some("gift"));
    }

    #[test]
    fn test_category_lookup() {
        assert_eq!(category_for_interests(&strings(&["Golf"])), "SportsAndOutdoors");
        assert_eq!(category_for_interests(&strings(&["knitting", "Reading"])), "Books");
        assert_eq!(category_for_interests(&strings(&["knitting"])), "All");
        assert_eq!(category_for_interests(&[]), "All");
    }

    #[test]
    fn test_category_needs_whole_words() {
        assert_eq!(category_for_interests(&strings(&["smart home"])), "All");
        assert_eq!(category_for_interests(&strings(&["party games"])), "All");
        assert_eq!(category_for_interests(&strings(&["heart health"])), "All");
        assert_eq!(category_for_interests(&strings(&["steam trains"])), "All");
        assert_eq!(category_for_interests(&strings(&["Board Games", "Books"])), "Books");
        assert_eq!(category_for_interests(&strings(&["video games"])), "VideoGames");
        assert_eq!(category_for_interests(&strings(&["Arts & Crafts"])), "ArtsAndCrafts");
    }

    #[test]
    fn test_condition_words_excluded() {
        assert!(has_condition_marker("Used Noise-Cancelling Headphones (Renewed)"));
        assert!(has_condition_marker("Golf Trolley - Spares or Repair, For Parts"));
        assert!(has_condition_marker("Laptop (Refurbished)"));
        assert!(!has_condition_marker("Unused Style Notebook"));
        assert!(!has_condition_marker("Noise-Cancelling Headphones"));
    }

    #[test]
    fn test_relevance_requires_shared_word() {
        assert!(is_relevant("Bushnell Golf Rangefinder with Slope", "golf rangefinder"));
        assert!(!is_relevant("Kitchen Knife Block", "golf rangefinder"));
        // Only short words in the keyword: no constraint.
        assert!(is_relevant("Anything At All", "tea set"));
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("Short title"), "Short title");

        let long = "x".repeat(150);
        let truncated = truncate_title(&long);
        assert_eq!(truncated.chars().count(), MAX_TITLE_CHARS);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_normalize_price() {
        assert_eq!(normalize_price("£24.99"), "24.99");
        assert_eq!(normalize_price("$1,299.00"), "1,299.00");
        assert_eq!(normalize_price("19.99 €"), "19.99");
    }
}
