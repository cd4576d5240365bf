//! `SearchItems` request payload.

use serde::Serialize;

/// Resources requested when the caller does not name any.
pub const DEFAULT_RESOURCES: [&str; 3] = [
    "Images.Primary.Medium",
    "ItemInfo.Title",
    "Offers.Listings.Price",
];

pub const DEFAULT_SEARCH_INDEX: &str = "All";

pub const DEFAULT_ITEM_COUNT: u32 = 10;

/// Body of a `SearchItems` call, minus the partner fields the client adds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchItemsPayload {
    pub keywords: String,
    pub item_count: u32,
    pub resources: Vec<String>,
    pub search_index: String,
}

impl SearchItemsPayload {
    /// Payload with the default item count, resources, and search index.
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            item_count: DEFAULT_ITEM_COUNT,
            resources: DEFAULT_RESOURCES.iter().map(|r| r.to_string()).collect(),
            search_index: DEFAULT_SEARCH_INDEX.to_string(),
        }
    }

    /// Build from generic parameters, defaulting whatever is omitted.
    ///
    /// Keyword emptiness is not checked here.
    pub fn build(
        keywords: impl Into<String>,
        item_count: Option<u32>,
        resources: Option<Vec<String>>,
        search_index: Option<&str>,
    ) -> Self {
        let mut payload = Self::new(keywords);
        if let Some(count) = item_count {
            payload.item_count = count;
        }
        if let Some(resources) = resources {
            payload.resources = resources;
        }
        if let Some(index) = search_index {
            payload.search_index = index.to_string();
        }
        payload
    }

    pub fn with_item_count(mut self, item_count: u32) -> Self {
        self.item_count = item_count;
        self
    }

    pub fn with_search_index(mut self, search_index: impl Into<String>) -> Self {
        self.search_index = search_index.into();
        self
    }
}

/// Partner fields PA-API requires on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerConfig {
    pub partner_tag: String,
    pub marketplace: String,
}

impl PartnerConfig {
    pub const PARTNER_TYPE: &'static str = "Associates";

    pub fn new(partner_tag: impl Into<String>, marketplace: impl Into<String>) -> Self {
        Self {
            partner_tag: partner_tag.into(),
            marketplace: marketplace.into(),
        }
    }
}

/// Full request body as transmitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SearchItemsBody<'a> {
    pub partner_tag: &'a str,
    pub partner_type: &'a str,
    pub marketplace: &'a str,
    #[serde(flatten)]
    pub payload: &'a SearchItemsPayload,
}

impl<'a> SearchItemsBody<'a> {
    pub fn new(partner: &'a PartnerConfig, payload: &'a SearchItemsPayload) -> Self {
        Self {
            partner_tag: &partner.partner_tag,
            partner_type: PartnerConfig::PARTNER_TYPE,
            marketplace: &partner.marketplace,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_applied() {
        let payload = SearchItemsPayload::build("golf balls", None, None, None);
        assert_eq!(payload.item_count, 10);
        assert_eq!(payload.search_index, "All");
        assert_eq!(
            payload.resources,
            vec!["Images.Primary.Medium", "ItemInfo.Title", "Offers.Listings.Price"]
        );
    }

    #[test]
    fn test_caller_fields_win() {
        let payload = SearchItemsPayload::build(
            "golf balls",
            Some(3),
            Some(vec!["ItemInfo.Title".to_string()]),
            Some("SportsAndOutdoors"),
        );
        assert_eq!(payload.item_count, 3);
        assert_eq!(payload.resources, vec!["ItemInfo.Title"]);
        assert_eq!(payload.search_index, "SportsAndOutdoors");
    }

    #[test]
    fn test_serializes_pascal_case() {
        let payload = SearchItemsPayload::new("journal").with_item_count(6);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["Keywords"], "journal");
        assert_eq!(value["ItemCount"], 6);
        assert_eq!(value["SearchIndex"], "All");
    }

    #[test]
    fn test_body_merges_partner_fields() {
        let partner = PartnerConfig::new("tag-21", "www.amazon.co.uk");
        let payload = SearchItemsPayload::new("journal");
        let body = serde_json::to_value(SearchItemsBody::new(&partner, &payload)).unwrap();

        assert_eq!(body["PartnerTag"], json!("tag-21"));
        assert_eq!(body["PartnerType"], json!("Associates"));
        assert_eq!(body["Marketplace"], json!("www.amazon.co.uk"));
        assert_eq!(body["Keywords"], json!("journal"));
    }
}
