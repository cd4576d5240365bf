//! Product search provider trait.

use async_trait::async_trait;
use paapi_client::{PaapiClient, SearchItemsPayload, SearchItemsResponse};

/// A product search backend that accepts PA-API `SearchItems` payloads.
///
/// Implementations sign and send the request. An `Errors` envelope should come
/// back as [`paapi_client::PaapiError::Rejected`].
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search_items(
        &self,
        payload: &SearchItemsPayload,
    ) -> paapi_client::Result<SearchItemsResponse>;
}

#[async_trait]
impl SearchProvider for PaapiClient {
    async fn search_items(
        &self,
        payload: &SearchItemsPayload,
    ) -> paapi_client::Result<SearchItemsResponse> {
        PaapiClient::search_items(self, payload).await
    }
}
