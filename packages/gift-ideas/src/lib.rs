//! Gift Ideas
//!
//! Turns a free-text request (or structured recipient details) into gift
//! ideas with a matching product attached to each.
//!
//! The two external services are treated as unreliable:
//!
//! - Model output is repaired, validated, and retried with exponential
//!   backoff. When that fails the caller still gets a fixed set of generic
//!   ideas.
//! - A failed product search leaves its idea without products instead of
//!   failing the run.
//!
//! Only configuration problems and invalid requests surface as errors.
//!
//! # Usage
//!
//! ```rust,ignore
//! use gift_ideas::{Config, GiftRequest};
//!
//! let advisor = Config::from_env()?.advisor()?;
//! let request = GiftRequest::from_query("gift for dad who loves golf")?;
//! let set = advisor.suggest(&request).await?;
//!
//! for suggestion in &set.suggestions {
//!     println!("{} ({} products)", suggestion.idea.title(), suggestion.products.len());
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Provider seams (completion model, product search)
//! - [`types`] - Requests, ideas, products
//! - [`repair`] - Completion text to JSON
//! - [`validate`] - JSON to validated ideas
//! - [`pipeline`] - Prompting, retrieval with retry/fallback, enrichment
//! - [`products`] - Keyword selection, search, and result filtering
//! - [`testing`] - Mock providers for testing

pub mod config;
pub mod error;
pub mod pipeline;
pub mod products;
pub mod repair;
pub mod testing;
pub mod traits;
pub mod types;
pub mod validate;

pub use config::Config;
pub use error::{GiftError, Result};
pub use pipeline::{
    build_prompt, fallback_ideas, GiftAdvisor, IdeaRetriever, RetrievalConfig,
    MAX_PRODUCTS_PER_SUGGESTION,
};
pub use products::ProductSearchClient;
pub use repair::{parse_completion, repair, RepairError};
pub use traits::{
    completion::{Completion, CompletionProvider, ProviderError},
    search::SearchProvider,
};
pub use types::{
    FallbackReason, GiftContext, GiftIdea, GiftRequest, IdeaSet, IdeaSource, Product, Suggestion,
    SuggestionSet, MAX_IDEAS,
};
pub use validate::validate_ideas;
