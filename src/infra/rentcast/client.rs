use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use rental_rater::fetch::auth::ApiKey;
use rental_rater::fetch::{BasicClient, fetch_bytes};

use crate::services::listing_api::ListingApi;

/// Client for the RentCast long-term rental listings endpoint. The API
/// key travels in the `X-Api-Key` header on every request.
pub struct RentCastClient {
    base_url: String,
    state: String,
    client: ApiKey<BasicClient>,
}

impl RentCastClient {
    pub fn new(api_key: String, state: String) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            base_url: "https://api.rentcast.io/v1".to_string(),
            state,
            client: ApiKey::x_api_key(BasicClient::with_client(inner), api_key),
        })
    }

    /// Reads the API key from `RENTAL_API_KEY`.
    pub fn from_env(state: String) -> Result<Self> {
        let api_key = std::env::var("RENTAL_API_KEY").context("RENTAL_API_KEY must be set")?;
        Self::new(api_key, state)
    }

    /// Pages through all active listings until the provider returns a
    /// short page.
    pub async fn fetch_all(&self, page_size: usize) -> Result<Vec<serde_json::Value>> {
        let mut records = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.fetch_page(offset, page_size).await?;
            let count = page.len();
            records.extend(page);
            info!(offset, count, total = records.len(), "Listing page fetched");

            if count < page_size {
                break;
            }
            offset += page_size;
        }

        Ok(records)
    }
}

#[async_trait]
impl ListingApi for RentCastClient {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<serde_json::Value>> {
        let url = format!(
            "{}/listings/rental/long-term?state={}&status=Active&limit={limit}&offset={offset}",
            self.base_url, self.state
        );

        let bytes = fetch_bytes(&self.client, &url).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
