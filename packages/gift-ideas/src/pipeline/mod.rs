//! The suggestion pipeline.
//!
//! 1. [`prompts`] renders a [`crate::types::GiftRequest`] as a prompt.
//! 2. [`retrieval`] calls the model, repairs and validates its output, and
//!    retries or falls back.
//! 3. [`enrich`] attaches products to each idea.

pub mod enrich;
pub mod prompts;
pub mod retrieval;

pub use enrich::{GiftAdvisor, MAX_PRODUCTS_PER_SUGGESTION};
pub use prompts::build_prompt;
pub use retrieval::{fallback_ideas, AttemptFailure, IdeaRetriever, RetrievalConfig};
