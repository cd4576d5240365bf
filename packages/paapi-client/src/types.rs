//! PA-API `SearchItems` response types.

use serde::Deserialize;

/// Response envelope. Carries either a search result or an error list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchItemsResponse {
    pub search_result: Option<SearchResult>,
    pub errors: Option<Vec<ApiErrorDetail>>,
}

impl SearchItemsResponse {
    /// Items from the result, or nothing when the envelope has no result.
    pub fn into_items(self) -> Vec<Item> {
        self.search_result.map(|r| r.items).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResult {
    #[serde(default)]
    pub items: Vec<Item>,
    pub total_result_count: Option<u32>,
    #[serde(rename = "SearchURL")]
    pub search_url: Option<String>,
}

/// One entry of the `Errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
    #[serde(rename = "ASIN")]
    pub asin: String,
    #[serde(rename = "DetailPageURL")]
    pub detail_page_url: Option<String>,
    pub item_info: Option<ItemInfo>,
    pub images: Option<Images>,
    pub offers: Option<Offers>,
}

impl Item {
    pub fn title(&self) -> Option<&str> {
        self.item_info
            .as_ref()?
            .title
            .as_ref()
            .map(|t| t.display_value.as_str())
    }

    pub fn image_url(&self) -> Option<&str> {
        self.images
            .as_ref()?
            .primary
            .as_ref()?
            .medium
            .as_ref()
            .map(|i| i.url.as_str())
    }

    /// Display amount of the first listing, e.g. `£24.99`.
    pub fn display_price(&self) -> Option<&str> {
        self.offers
            .as_ref()?
            .listings
            .first()?
            .price
            .as_ref()?
            .display_amount
            .as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemInfo {
    pub title: Option<DisplayValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisplayValue {
    pub display_value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Images {
    pub primary: Option<ImageSet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageSet {
    pub small: Option<Image>,
    pub medium: Option<Image>,
    pub large: Option<Image>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Image {
    #[serde(rename = "URL")]
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Offers {
    #[serde(default)]
    pub listings: Vec<Listing>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Listing {
    pub price: Option<Price>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Price {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub display_amount: Option<String>,
}
