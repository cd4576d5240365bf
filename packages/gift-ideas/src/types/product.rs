//! Products attached to gift ideas.

use serde::{Deserialize, Serialize};

use super::idea::{GiftIdea, IdeaSource};

/// A normalized product from the search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Provider item id (ASIN)
    pub id: String,
    /// Display title, truncated for layout
    pub title: String,
    pub image: Option<String>,
    /// Price without currency symbol, e.g. `24.99`
    pub price: Option<String>,
    /// Detail page URL
    pub url: String,
}

/// A gift idea with the products found for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    #[serde(flatten)]
    pub idea: GiftIdea,
    pub products: Vec<Product>,
}

/// Output of a full suggestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionSet {
    pub suggestions: Vec<Suggestion>,
    pub source: IdeaSource,
}
