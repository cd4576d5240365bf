//! Suggestion entry point: ideas first, then products for each idea.

use futures::future::join_all;
use tracing::info;

use crate::error::Result;
use crate::products::ProductSearchClient;
use crate::traits::{completion::CompletionProvider, search::SearchProvider};
use crate::types::{GiftRequest, Suggestion, SuggestionSet};

use super::prompts::build_prompt;
use super::retrieval::IdeaRetriever;

/// Products attached to each idea.
pub const MAX_PRODUCTS_PER_SUGGESTION: usize = 1;

/// Turns a gift request into ideas with products attached.
pub struct GiftAdvisor<C, S> {
    retriever: IdeaRetriever<C>,
    products: ProductSearchClient<S>,
    products_per_idea: usize,
}

impl<C: CompletionProvider, S: SearchProvider> GiftAdvisor<C, S> {
    pub fn new(retriever: IdeaRetriever<C>, products: ProductSearchClient<S>) -> Self {
        Self {
            retriever,
            products,
            products_per_idea: MAX_PRODUCTS_PER_SUGGESTION,
        }
    }

    pub fn with_products_per_idea(mut self, count: usize) -> Self {
        self.products_per_idea = count;
        self
    }

    pub fn retriever(&self) -> &IdeaRetriever<C> {
        &self.retriever
    }

    pub fn products(&self) -> &ProductSearchClient<S> {
        &self.products
    }

    /// Suggest gifts for a validated request.
    ///
    /// Searches run concurrently, one per idea, and suggestions keep the
    /// order the ideas came in. An idea whose search finds nothing is kept
    /// with no products. Only a configuration error fails the call.
    pub async fn suggest(&self, request: &GiftRequest) -> Result<SuggestionSet> {
        let prompt = build_prompt(request, self.retriever.config().idea_limit());
        let idea_set = self.retriever.retrieve(&prompt).await;

        let interests = &request.context.interests;
        let searches = idea_set.ideas.iter().map(|idea| {
            self.products
                .search(idea.keywords(), self.products_per_idea, interests)
        });
        let results = join_all(searches).await;

        let suggestions = idea_set
            .ideas
            .into_iter()
            .zip(results)
            .map(|(idea, products)| products.map(|products| Suggestion { idea, products }))
            .collect::<Result<Vec<_>>>()?;

        info!(
            suggestions = suggestions.len(),
            with_products = suggestions.iter().filter(|s| !s.products.is_empty()).count(),
            fallback = idea_set.source.is_fallback(),
            "Suggestions ready"
        );

        Ok(SuggestionSet {
            suggestions,
            source: idea_set.source,
        })
    }
}
