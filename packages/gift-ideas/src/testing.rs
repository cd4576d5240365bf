//! Testing utilities including mock implementations.
//!
//! These let applications exercise the suggestion pipeline without calling
//! the generative model or the product search API.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use paapi_client::{
    types::{DisplayValue, Image, ImageSet, Images, ItemInfo, Listing, Offers, Price, SearchResult},
    ApiErrorDetail, Item, PaapiError, SearchItemsPayload, SearchItemsResponse,
};

use crate::traits::{
    completion::{Completion, CompletionProvider, ProviderError},
    search::SearchProvider,
};

type Reply = Result<Completion, ProviderError>;

/// A mock completion provider.
///
/// Replies are served from a queue in order; once the queue is drained every
/// call gets the default reply. Clones share state.
#[derive(Clone)]
pub struct MockCompletionProvider {
    replies: Arc<RwLock<VecDeque<Reply>>>,
    default_reply: Arc<RwLock<Reply>>,
    /// Prompts received, for assertions
    calls: Arc<RwLock<Vec<String>>>,
}

impl Default for MockCompletionProvider {
    fn default() -> Self {
        Self {
            replies: Arc::default(),
            default_reply: Arc::new(RwLock::new(Ok(Completion::Text(String::new())))),
            calls: Arc::default(),
        }
    }
}

impl MockCompletionProvider {
    /// Create a mock that answers every prompt with empty text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that always reports rate limiting.
    pub fn rate_limited() -> Self {
        Self::new().with_default(Err(ProviderError::RateLimited))
    }

    /// Mock that always returns `text`.
    pub fn always(text: impl Into<String>) -> Self {
        Self::new().with_default(Ok(Completion::Text(text.into())))
    }

    /// Queue a reply.
    pub fn with_reply(self, reply: Reply) -> Self {
        self.replies.write().unwrap().push_back(reply);
        self
    }

    /// Queue a text completion.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_reply(Ok(Completion::Text(text.into())))
    }

    /// Queue a safety block.
    pub fn with_block(self, reason: impl Into<String>) -> Self {
        self.with_reply(Ok(Completion::Blocked {
            reason: reason.into(),
        }))
    }

    /// Reply used once the queue is empty.
    pub fn with_default(self, reply: Reply) -> Self {
        *self.default_reply.write().unwrap() = reply;
        self
    }

    /// Get all prompts sent to this mock.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, prompt: &str) -> Result<Completion, ProviderError> {
        self.calls.write().unwrap().push(prompt.to_string());

        let queued = self.replies.write().unwrap().pop_front();
        queued.unwrap_or_else(|| self.default_reply.read().unwrap().clone())
    }
}

#[derive(Clone)]
enum SearchBehavior {
    Respond,
    Reject(Vec<ApiErrorDetail>),
    Unconfigured(String),
    Fail { status: u16, message: String },
}

/// A mock product search provider.
///
/// Items are keyed by the exact keyword searched. Unknown keywords get the
/// default items (none unless set). Clones share state.
#[derive(Clone)]
pub struct MockSearchProvider {
    items: Arc<RwLock<HashMap<String, Vec<Item>>>>,
    default_items: Arc<RwLock<Vec<Item>>>,
    behavior: Arc<RwLock<SearchBehavior>>,
    /// Payloads received, for assertions
    calls: Arc<RwLock<Vec<SearchItemsPayload>>>,
}

impl Default for MockSearchProvider {
    fn default() -> Self {
        Self {
            items: Arc::default(),
            default_items: Arc::default(),
            behavior: Arc::new(RwLock::new(SearchBehavior::Respond)),
            calls: Arc::default(),
        }
    }
}

impl MockSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items returned for one keyword.
    pub fn with_items(self, keyword: impl Into<String>, items: Vec<Item>) -> Self {
        self.items.write().unwrap().insert(keyword.into(), items);
        self
    }

    /// Items returned for any keyword without its own entry.
    pub fn with_default_items(self, items: Vec<Item>) -> Self {
        *self.default_items.write().unwrap() = items;
        self
    }

    /// Answer every search with an `Errors` envelope.
    pub fn rejecting(self, errors: Vec<ApiErrorDetail>) -> Self {
        *self.behavior.write().unwrap() = SearchBehavior::Reject(errors);
        self
    }

    /// Fail every search as if credentials were missing.
    pub fn unconfigured(self, message: impl Into<String>) -> Self {
        *self.behavior.write().unwrap() = SearchBehavior::Unconfigured(message.into());
        self
    }

    /// Fail every search with a non-2xx status.
    pub fn failing(self, status: u16, message: impl Into<String>) -> Self {
        *self.behavior.write().unwrap() = SearchBehavior::Fail {
            status,
            message: message.into(),
        };
        self
    }

    /// Get all payloads sent to this mock.
    pub fn calls(&self) -> Vec<SearchItemsPayload> {
        self.calls.read().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search_items(
        &self,
        payload: &SearchItemsPayload,
    ) -> paapi_client::Result<SearchItemsResponse> {
        self.calls.write().unwrap().push(payload.clone());

        let behavior = self.behavior.read().unwrap().clone();
        match behavior {
            SearchBehavior::Respond => {}
            SearchBehavior::Reject(errors) => return Err(PaapiError::Rejected(errors)),
            SearchBehavior::Unconfigured(message) => return Err(PaapiError::Config(message)),
            SearchBehavior::Fail { status, message } => {
                return Err(PaapiError::Api { status, message })
            }
        }

        let items = self
            .items
            .read()
            .unwrap()
            .get(&payload.keywords)
            .cloned()
            .unwrap_or_else(|| self.default_items.read().unwrap().clone());

        Ok(SearchItemsResponse {
            search_result: Some(SearchResult {
                total_result_count: Some(items.len() as u32),
                items,
                search_url: None,
            }),
            errors: None,
        })
    }
}

/// Build a search result item with a detail URL and image derived from the ASIN.
pub fn mock_item(asin: &str, title: &str, display_price: Option<&str>) -> Item {
    Item {
        asin: asin.to_string(),
        detail_page_url: Some(format!("https://www.amazon.co.uk/dp/{}", asin)),
        item_info: Some(ItemInfo {
            title: Some(DisplayValue {
                display_value: title.to_string(),
            }),
        }),
        images: Some(Images {
            primary: Some(ImageSet {
                medium: Some(Image {
                    url: format!("https://m.media-amazon.com/images/I/{}.jpg", asin),
                    height: Some(160),
                    width: Some(160),
                }),
                ..Default::default()
            }),
        }),
        offers: display_price.map(|price| Offers {
            listings: vec![Listing {
                price: Some(Price {
                    display_amount: Some(price.to_string()),
                    ..Default::default()
                }),
            }],
        }),
    }
}
