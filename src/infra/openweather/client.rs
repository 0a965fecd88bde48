use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use rental_rater::fetch::auth::UrlParam;
use rental_rater::fetch::{BasicClient, fetch_bytes};
use rental_rater::parser::{PollutionSample, parse_response};

use crate::services::air_api::AirPollutionApi;

/// Client for the OpenWeatherMap air pollution endpoint. The API key is
/// passed as the `appid` query parameter on every request.
pub struct OpenWeatherClient {
    base_url: String,
    client: UrlParam<BasicClient>,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            base_url: "http://api.openweathermap.org/data/2.5".to_string(),
            client: UrlParam::appid(BasicClient::with_client(inner), api_key),
        })
    }

    /// Reads the API key from `OPENWEATHER_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("OPENWEATHER_API_KEY").context("OPENWEATHER_API_KEY must be set")?;
        Self::new(api_key)
    }
}

#[async_trait]
impl AirPollutionApi for OpenWeatherClient {
    async fn current_pollution(&self, lat: f64, lon: f64) -> Result<PollutionSample> {
        let url = format!("{}/air_pollution?lat={lat}&lon={lon}", self.base_url);

        let bytes = fetch_bytes(&self.client, &url).await?;
        let response = parse_response(&bytes)?;

        response
            .list
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("provider returned no samples for {lat},{lon}"))
    }
}
