//! Amazon Product Advertising API v5 client.
//!
//! A minimal client for the PA-API `SearchItems` operation. Requests are
//! signed with AWS Signature Version 4 (see [`signing`]); the payload is
//! serialized once, signed, and sent as the exact same bytes.
//!
//! # Example
//!
//! ```rust,ignore
//! use paapi_client::{PaapiClient, PartnerConfig, SearchItemsPayload, SigningCredential};
//!
//! let credential = SigningCredential::new(access_key, secret_key, "eu-west-1", "webservices.amazon.co.uk");
//! let client = PaapiClient::new(credential, PartnerConfig::new("mytag-21", "www.amazon.co.uk"));
//!
//! let response = client
//!     .search_items(&SearchItemsPayload::new("golf rangefinder").with_item_count(6))
//!     .await?;
//! for item in response.into_items() {
//!     println!("{:?}", item.title());
//! }
//! ```

pub mod credentials;
pub mod error;
pub mod payload;
pub mod signing;
pub mod types;

pub use credentials::{ExposeSecret, SecretString, SigningCredential};
pub use error::{PaapiError, Result, SigningError};
pub use payload::{PartnerConfig, SearchItemsPayload, DEFAULT_RESOURCES};
pub use signing::{sign, SignableRequest, SignedRequest, SigningContext};
pub use types::{ApiErrorDetail, Item, SearchItemsResponse};

use std::collections::BTreeMap;

use payload::SearchItemsBody;
use reqwest::Client;
use tracing::{debug, warn};

/// Path of the `SearchItems` operation.
pub const SEARCH_ITEMS_PATH: &str = "/paapi5/searchitems";

const SEARCH_ITEMS_TARGET: &str = "com.amazon.paapi5.v1.ProductAdvertisingAPIv1.SearchItems";
const CONTENT_ENCODING: &str = "amz-1.0";
const CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// A signed request ready to send.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub url: String,
    /// Lowercased header names, including `authorization`.
    pub headers: BTreeMap<String, String>,
    /// The exact bytes covered by the signature.
    pub body: Vec<u8>,
}

/// PA-API client.
#[derive(Clone)]
pub struct PaapiClient {
    http_client: Client,
    credential: SigningCredential,
    partner: PartnerConfig,
    base_url: String,
}

impl PaapiClient {
    pub fn new(credential: SigningCredential, partner: PartnerConfig) -> Self {
        let base_url = format!("https://{}", credential.host);
        Self {
            http_client: Client::new(),
            credential,
            partner,
            base_url,
        }
    }

    /// Set a custom base URL (for proxies). The signed `host` header still
    /// comes from the credential.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Use a preconfigured HTTP client (timeouts, connection pool).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn partner(&self) -> &PartnerConfig {
        &self.partner
    }

    /// Serialize, merge partner fields, and sign a `SearchItems` request.
    ///
    /// The payload is finalized before signing; the returned body must be sent
    /// unchanged.
    pub fn prepare_search_items(
        &self,
        payload: &SearchItemsPayload,
        context: &SigningContext,
    ) -> Result<PreparedRequest> {
        if self.partner.partner_tag.trim().is_empty() {
            return Err(PaapiError::Config("missing partner tag".into()));
        }
        self.credential.ensure_complete()?;

        let body = serde_json::to_vec(&SearchItemsBody::new(&self.partner, payload))
            .map_err(|e| PaapiError::Parse(format!("Failed to serialize request: {}", e)))?;

        let request = SignableRequest::new("POST", SEARCH_ITEMS_PATH)
            .with_header("content-encoding", CONTENT_ENCODING)
            .with_header("content-type", CONTENT_TYPE)
            .with_header("host", self.credential.host.clone())
            .with_header("x-amz-date", context.amz_date())
            .with_header("x-amz-target", SEARCH_ITEMS_TARGET)
            .with_payload(body);

        let signed = sign(&self.credential, context, &request)?;
        let (mut headers, body) = request.into_parts();
        headers.insert("authorization".to_string(), signed.authorization);

        Ok(PreparedRequest {
            url: format!("{}{}", self.base_url, SEARCH_ITEMS_PATH),
            headers,
            body,
        })
    }

    /// Run a `SearchItems` call.
    ///
    /// An `Errors` envelope is returned as [`PaapiError::Rejected`].
    pub async fn search_items(&self, payload: &SearchItemsPayload) -> Result<SearchItemsResponse> {
        let start = std::time::Instant::now();
        let prepared = self.prepare_search_items(payload, &SigningContext::now())?;

        let mut request = self.http_client.post(&prepared.url);
        for (name, value) in &prepared.headers {
            // reqwest derives Host from the URL
            if name == "host" {
                continue;
            }
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.body(prepared.body).send().await.map_err(|e| {
            warn!(error = %e, "PA-API request failed");
            PaapiError::Network(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        let parsed: Option<SearchItemsResponse> = serde_json::from_str(&text).ok();
        if let Some(errors) = parsed.as_ref().and_then(|r| r.errors.clone()) {
            if !errors.is_empty() {
                warn!(status = %status, codes = ?errors.iter().map(|e| &e.code).collect::<Vec<_>>(), "PA-API returned errors");
                return Err(PaapiError::Rejected(errors));
            }
        }

        if !status.is_success() {
            warn!(status = %status, error = %text, "PA-API error");
            return Err(PaapiError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let parsed = parsed.ok_or_else(|| {
            PaapiError::Parse("Failed to deserialize SearchItems response".into())
        })?;

        debug!(
            keywords = %payload.keywords,
            items = parsed.search_result.as_ref().map(|r| r.items.len()).unwrap_or(0),
            duration_ms = start.elapsed().as_millis(),
            "PA-API search"
        );

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn client() -> PaapiClient {
        PaapiClient::new(
            SigningCredential::new("AKIDTEST", "secret", "eu-west-1", "webservices.amazon.co.uk"),
            PartnerConfig::new("giftfinder-21", "www.amazon.co.uk"),
        )
    }

    fn context() -> SigningContext {
        SigningContext::at(Utc.with_ymd_and_hms(2025, 10, 26, 15, 20, 35).unwrap())
    }

    #[test]
    fn test_client_builder() {
        let client = client().with_base_url("https://proxy.local");
        assert_eq!(client.base_url(), "https://proxy.local");
        assert_eq!(client.partner().partner_tag, "giftfinder-21");
    }

    #[test]
    fn test_prepare_signs_all_headers() {
        let prepared = client()
            .prepare_search_items(&SearchItemsPayload::new("golf"), &context())
            .unwrap();

        assert_eq!(prepared.url, "https://webservices.amazon.co.uk/paapi5/searchitems");
        assert_eq!(prepared.headers["x-amz-date"], "20251026T152035Z");

        let auth = &prepared.headers["authorization"];
        assert!(auth.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIDTEST/20251026/eu-west-1/ProductAdvertisingAPI/aws4_request, "
        ));
        assert!(auth.contains(
            "SignedHeaders=content-encoding;content-type;host;x-amz-date;x-amz-target, "
        ));
    }

    #[test]
    fn test_prepared_body_matches_signature() {
        let client = client();
        let ctx = context();
        let prepared = client
            .prepare_search_items(&SearchItemsPayload::new("golf"), &ctx)
            .unwrap();

        let body: serde_json::Value = serde_json::from_slice(&prepared.body).unwrap();
        assert_eq!(body["PartnerTag"], "giftfinder-21");
        assert_eq!(body["PartnerType"], "Associates");
        assert_eq!(body["Keywords"], "golf");

        // Re-signing the transmitted bytes yields the same header.
        let mut request = SignableRequest::new("POST", SEARCH_ITEMS_PATH);
        for (name, value) in prepared.headers.iter().filter(|(n, _)| *n != "authorization") {
            request = request.with_header(name, value.clone());
        }
        let request = request.with_payload(prepared.body.clone());
        let resigned = sign(&client.credential, &ctx, &request).unwrap();
        assert_eq!(resigned.authorization, prepared.headers["authorization"]);
    }

    #[test]
    fn test_missing_partner_tag_is_config_error() {
        let client = PaapiClient::new(
            SigningCredential::new("AKIDTEST", "secret", "eu-west-1", "webservices.amazon.co.uk"),
            PartnerConfig::new("", "www.amazon.co.uk"),
        );
        let err = client
            .prepare_search_items(&SearchItemsPayload::new("golf"), &context())
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_missing_secret_is_config_error() {
        let client = PaapiClient::new(
            SigningCredential::new("AKIDTEST", "", "eu-west-1", "webservices.amazon.co.uk"),
            PartnerConfig::new("giftfinder-21", "www.amazon.co.uk"),
        );
        let err = client
            .prepare_search_items(&SearchItemsPayload::new("golf"), &context())
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("secret_key"));
    }

    #[test]
    fn test_search_fails_before_sending_without_credentials() {
        let client = PaapiClient::new(
            SigningCredential::new("", "", "eu-west-1", "webservices.amazon.co.uk"),
            PartnerConfig::new("giftfinder-21", "www.amazon.co.uk"),
        )
        .with_base_url("http://127.0.0.1:9");

        let result = tokio_test::block_on(client.search_items(&SearchItemsPayload::new("golf")));
        let err = tokio_test::assert_err!(result);
        assert!(err.is_configuration());
        assert!(err.to_string().contains("access_key_id"));
    }
}
