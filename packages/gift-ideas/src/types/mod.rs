//! Domain types shared across the pipeline.

pub mod idea;
pub mod product;
pub mod request;

pub use idea::{FallbackReason, GiftIdea, IdeaSet, IdeaSource, MAX_IDEAS};
pub use product::{Product, Suggestion, SuggestionSet};
pub use request::{GiftContext, GiftRequest};
