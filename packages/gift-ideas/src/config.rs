use anyhow::{Context, Result};
use dotenvy::dotenv;
use gemini_client::GeminiClient;
use paapi_client::{ExposeSecret, PaapiClient, PartnerConfig, SecretString, SigningCredential};
use std::env;
use std::time::Duration;

use crate::pipeline::{GiftAdvisor, IdeaRetriever, RetrievalConfig};
use crate::products::ProductSearchClient;

/// Application configuration loaded from environment variables.
///
/// Missing provider credentials are not a load error. A blank Gemini key
/// makes retrieval fall back; blank Amazon credentials surface as
/// [`crate::GiftError::Configuration`] on the first search.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: SecretString,
    pub gemini_model: String,
    pub gemini_request_timeout_ms: u64,
    pub amazon_access_key: SecretString,
    pub amazon_secret_key: SecretString,
    pub amazon_partner_tag: String,
    pub amazon_region: String,
    pub amazon_host: String,
    pub amazon_marketplace: String,
    pub amazon_request_timeout_ms: u64,
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub retry_jitter: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default().into(),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| gemini_client::DEFAULT_MODEL.to_string()),
            gemini_request_timeout_ms: env::var("GEMINI_REQUEST_TIMEOUT_MS")
                .unwrap_or_else(|_| "30000".to_string())
                .parse()
                .context("GEMINI_REQUEST_TIMEOUT_MS must be a valid number")?,
            amazon_access_key: env::var("AMAZON_PA_ACCESS_KEY").unwrap_or_default().into(),
            amazon_secret_key: env::var("AMAZON_PA_SECRET_KEY").unwrap_or_default().into(),
            amazon_partner_tag: env::var("AMAZON_PARTNER_TAG").unwrap_or_default(),
            amazon_region: env::var("AMAZON_PA_REGION")
                .unwrap_or_else(|_| "eu-west-1".to_string()),
            amazon_host: env::var("AMAZON_PA_HOST")
                .unwrap_or_else(|_| "webservices.amazon.co.uk".to_string()),
            amazon_marketplace: env::var("AMAZON_MARKETPLACE")
                .unwrap_or_else(|_| "www.amazon.co.uk".to_string()),
            amazon_request_timeout_ms: env::var("AMAZON_REQUEST_TIMEOUT_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .context("AMAZON_REQUEST_TIMEOUT_MS must be a valid number")?,
            max_retries: env::var("GIFT_MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("GIFT_MAX_RETRIES must be a valid number")?,
            base_delay_ms: env::var("GIFT_BASE_DELAY_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .context("GIFT_BASE_DELAY_MS must be a valid number")?,
            retry_jitter: env::var("GIFT_RETRY_JITTER")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .context("GIFT_RETRY_JITTER must be true or false")?,
        })
    }

    pub fn retrieval_config(&self) -> RetrievalConfig {
        RetrievalConfig::default()
            .with_max_retries(self.max_retries)
            .with_base_delay(Duration::from_millis(self.base_delay_ms))
            .with_jitter(self.retry_jitter)
    }

    pub fn gemini_client(&self) -> Result<GeminiClient> {
        let http_client = http_client(self.gemini_request_timeout_ms)?;
        Ok(GeminiClient::new(self.gemini_api_key.expose_secret())
            .with_model(&self.gemini_model)
            .with_http_client(http_client))
    }

    pub fn signing_credential(&self) -> SigningCredential {
        SigningCredential::new(
            self.amazon_access_key.expose_secret(),
            self.amazon_secret_key.expose_secret(),
            &self.amazon_region,
            &self.amazon_host,
        )
    }

    /// PA-API client whose requests give up after `amazon_request_timeout_ms`.
    pub fn paapi_client(&self) -> Result<PaapiClient> {
        let http_client = http_client(self.amazon_request_timeout_ms)?;
        Ok(PaapiClient::new(
            self.signing_credential(),
            PartnerConfig::new(&self.amazon_partner_tag, &self.amazon_marketplace),
        )
        .with_http_client(http_client))
    }

    /// Wire the live providers into an advisor.
    pub fn advisor(&self) -> Result<GiftAdvisor<GeminiClient, PaapiClient>> {
        Ok(GiftAdvisor::new(
            IdeaRetriever::new(self.gemini_client()?).with_config(self.retrieval_config()),
            ProductSearchClient::new(self.paapi_client()?),
        ))
    }
}

fn http_client(timeout_ms: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .context("Failed to create HTTP client")
}
