use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, instrument};

use super::util::with_retry;
use crate::core::config::ProviderConfig;
use crate::core::rates::{Catalog, DateWindow, HistorySeries, RatePoint, RateProvider};

const USER_AGENT: &str = concat!("fxdash/", env!("CARGO_PKG_VERSION"));

/// Client for the Frankfurter exchange rate API (ECB reference rates).
pub struct FrankfurterProvider {
    base_url: String,
    client: reqwest::Client,
    retries: usize,
    retry_delay: Duration,
}

impl FrankfurterProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(FrankfurterProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            retries: config.retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T> {
        debug!("Requesting {} from {}", what, url);

        let response = with_retry(
            || self.client.get(url).query(query).send(),
            self.retries,
            self.retry_delay,
        )
        .await
        .with_context(|| format!("Request error for {what}: {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for {}", response.status(), what));
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", what, e))
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    rates: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    rates: BTreeMap<NaiveDate, HashMap<String, f64>>,
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    #[instrument(name = "CurrencyListFetch", skip(self))]
    async fn get_currencies(&self) -> Result<Catalog> {
        let url = format!("{}/currencies", self.base_url);
        let currencies: BTreeMap<String, String> = self.get_json(&url, &[], "currency list").await?;
        if currencies.is_empty() {
            return Err(anyhow!("Currency list is empty"));
        }
        Ok(Catalog::new(currencies))
    }

    #[instrument(name = "SpotRateFetch", skip(self))]
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let pair = format!("{from}/{to}");
        let url = format!("{}/latest", self.base_url);
        let query = [("from", from), ("to", to)];
        let data: LatestResponse = self.get_json(&url, &query, &pair).await?;

        data.rates
            .get(to)
            .copied()
            .ok_or_else(|| anyhow!("No rate data found for currency pair: {}", pair))
    }

    #[instrument(name = "HistoryFetch", skip(self, window), fields(window = %window))]
    async fn get_history(
        &self,
        from: &str,
        to: &str,
        window: &DateWindow,
    ) -> Result<HistorySeries> {
        let pair = format!("{from}/{to}");
        let url = format!("{}/{}", self.base_url, window);
        let query = [("from", from), ("to", to)];
        let data: TimeSeriesResponse = self.get_json(&url, &query, &pair).await?;

        let points = data
            .rates
            .into_iter()
            .filter_map(|(date, rates)| rates.get(to).map(|rate| RatePoint { date, rate: *rate }))
            .collect::<Vec<_>>();
        debug!(points = points.len(), "Parsed history series");

        Ok(HistorySeries::new(from, to, points))
    }
}
