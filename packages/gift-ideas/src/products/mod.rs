//! Product search for gift ideas.
//!
//! [`ProductSearchClient`] turns an idea's keywords into one signed PA-API
//! search and normalizes the result. Provider failures degrade to an empty
//! list so one failed search never sinks the whole suggestion run; only
//! configuration errors propagate.

pub mod relevance;

use paapi_client::{Item, PaapiError, SearchItemsPayload, SearchItemsResponse};
use tracing::{debug, warn};

use crate::error::{GiftError, Result};
use crate::traits::search::SearchProvider;
use crate::types::Product;

pub use relevance::{category_for_interests, score_keyword, select_keyword};

/// Items requested from the provider before filtering.
pub const ITEMS_TO_FETCH: u32 = 6;

/// PA-API caps `ItemCount` at 10.
const MAX_ITEM_COUNT: u32 = 10;

/// Searches products for gift ideas.
pub struct ProductSearchClient<S> {
    provider: S,
    items_to_fetch: u32,
}

impl<S: SearchProvider> ProductSearchClient<S> {
    pub fn new(provider: S) -> Self {
        Self {
            provider,
            items_to_fetch: ITEMS_TO_FETCH,
        }
    }

    /// Set how many items to request before filtering.
    pub fn with_items_to_fetch(mut self, count: u32) -> Self {
        self.items_to_fetch = count.clamp(1, MAX_ITEM_COUNT);
        self
    }

    pub fn provider(&self) -> &S {
        &self.provider
    }

    /// Search products for the best of `keywords`.
    ///
    /// Returns at most `desired_count` products. Provider errors yield an
    /// empty list; a configuration error is returned as
    /// [`GiftError::Configuration`].
    pub async fn search(
        &self,
        keywords: &[String],
        desired_count: usize,
        interest_hints: &[String],
    ) -> Result<Vec<Product>> {
        if desired_count == 0 {
            return Ok(Vec::new());
        }

        let Some(keyword) = select_keyword(keywords) else {
            debug!("No usable keyword, skipping product search");
            return Ok(Vec::new());
        };

        let category = category_for_interests(interest_hints);
        let item_count = self
            .items_to_fetch
            .max(u32::try_from(desired_count).unwrap_or(MAX_ITEM_COUNT))
            .min(MAX_ITEM_COUNT);
        let payload = SearchItemsPayload::build(keyword, Some(item_count), None, Some(category));

        let response = match self.provider.search_items(&payload).await {
            Ok(response) => response,
            Err(e) if e.is_configuration() => {
                return Err(GiftError::Configuration(e.to_string()));
            }
            Err(PaapiError::Rejected(errors)) => {
                warn!(keyword, errors = ?errors, "Product search rejected");
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!(keyword, error = %e, "Product search failed");
                return Ok(Vec::new());
            }
        };

        let products = normalize_response(response, keyword, desired_count);
        debug!(keyword, category, count = products.len(), "Product search complete");
        Ok(products)
    }
}

/// Filter and normalize a response into at most `limit` products.
pub fn normalize_response(
    response: SearchItemsResponse,
    keyword: &str,
    limit: usize,
) -> Vec<Product> {
    if response.errors.as_ref().is_some_and(|e| !e.is_empty()) {
        warn!(keyword, "Search response carried an error envelope");
        return Vec::new();
    }

    response
        .into_items()
        .iter()
        .filter_map(|item| normalize_item(item, keyword))
        .take(limit)
        .collect()
}

/// Normalize one item; `None` when it fails any filter.
pub fn normalize_item(item: &Item, keyword: &str) -> Option<Product> {
    let title = item.title().map(str::trim).filter(|t| !t.is_empty())?;
    let url = item
        .detail_page_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())?;

    if relevance::has_condition_marker(title) {
        debug!(asin = %item.asin, title, "Dropped non-new item");
        return None;
    }
    if !relevance::is_relevant(title, keyword) {
        debug!(asin = %item.asin, title, keyword, "Dropped off-topic item");
        return None;
    }

    Some(Product {
        id: item.asin.clone(),
        title: relevance::truncate_title(title),
        image: item.image_url().map(str::to_string),
        price: item
            .display_price()
            .map(relevance::normalize_price)
            .filter(|p| !p.is_empty()),
        url: url.to_string(),
    })
}
