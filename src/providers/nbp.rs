use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::core::error::FetchError;
use crate::core::rates::{BidAskRate, MidRate, QuotationCount, RateSeries, RateSource};

/// Rate source backed by the NBP Web API (`api.nbp.pl`).
///
/// Table A carries mid rates, table C carries bid/ask rates.
pub struct NbpProvider {
    base_url: String,
    client: reqwest::Client,
}

impl NbpProvider {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("nbp-rates/0.1")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(NbpProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn rates_url(&self, table: char, currency: &str, selector: &str) -> String {
        format!(
            "{}/api/exchangerates/rates/{}/{}/{}/?format=json",
            self.base_url, table, currency, selector
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!("Requesting rate data from {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(error = %e, url, "Upstream request failed");
            FetchError::UpstreamUnavailable {
                url: url.to_string(),
                status: None,
                body: e.to_string(),
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FetchError::UpstreamUnavailable {
                url: url.to_string(),
                status: Some(status.as_u16()),
                body: e.to_string(),
            })?;
        // The API prefixes some bodies with a byte order mark
        let text = text.trim_start_matches('\u{feff}');

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %text, url, "Upstream returned an error");
            return Err(FetchError::UpstreamUnavailable {
                url: url.to_string(),
                status: Some(status.as_u16()),
                body: text.trim().to_string(),
            });
        }

        serde_json::from_str(text).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn get_series<E: DeserializeOwned>(&self, url: &str) -> Result<Vec<E>, FetchError> {
        let data: SeriesResponse<E> = self.get_json(url).await?;
        if data.rates.is_empty() {
            return Err(FetchError::Empty {
                url: url.to_string(),
            });
        }
        debug!(count = data.rates.len(), "Received rate series");
        Ok(data.rates)
    }
}

#[derive(Debug, Deserialize)]
struct SeriesResponse<E> {
    #[serde(default = "Vec::new")]
    rates: Vec<E>,
}

#[derive(Debug, Deserialize)]
struct MidEntry {
    #[serde(rename = "effectiveDate")]
    effective_date: NaiveDate,
    mid: f64,
}

#[derive(Debug, Deserialize)]
struct BidAskEntry {
    #[serde(rename = "effectiveDate")]
    effective_date: NaiveDate,
    bid: f64,
    ask: f64,
}

#[derive(Debug, Deserialize)]
struct TableResponse {
    rates: Vec<TableEntry>,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    code: String,
}

impl From<MidEntry> for MidRate {
    fn from(entry: MidEntry) -> Self {
        MidRate {
            effective_date: entry.effective_date,
            mid: entry.mid,
        }
    }
}

impl From<BidAskEntry> for BidAskRate {
    fn from(entry: BidAskEntry) -> Self {
        BidAskRate {
            effective_date: entry.effective_date,
            bid: entry.bid,
            ask: entry.ask,
        }
    }
}

#[async_trait]
impl RateSource for NbpProvider {
    #[instrument(name = "NbpAverageFetch", skip(self), fields(currency = %currency, date = %date))]
    async fn fetch_average_rate_series(
        &self,
        currency: &str,
        date: NaiveDate,
    ) -> Result<RateSeries<MidRate>, FetchError> {
        let url = self.rates_url('a', currency, &date.format("%Y-%m-%d").to_string());
        let entries: Vec<MidEntry> = self.get_series(&url).await?;
        Ok(entries.into_iter().map(MidRate::from).collect())
    }

    #[instrument(name = "NbpLastMidFetch", skip(self), fields(currency = %currency, count = %count))]
    async fn fetch_last_n_average_series(
        &self,
        currency: &str,
        count: QuotationCount,
    ) -> Result<RateSeries<MidRate>, FetchError> {
        let url = self.rates_url('a', currency, &format!("last/{count}"));
        let entries: Vec<MidEntry> = self.get_series(&url).await?;
        Ok(entries.into_iter().map(MidRate::from).collect())
    }

    #[instrument(name = "NbpLastBidAskFetch", skip(self), fields(currency = %currency, count = %count))]
    async fn fetch_last_n_bid_ask_series(
        &self,
        currency: &str,
        count: QuotationCount,
    ) -> Result<RateSeries<BidAskRate>, FetchError> {
        let url = self.rates_url('c', currency, &format!("last/{count}"));
        let entries: Vec<BidAskEntry> = self.get_series(&url).await?;
        Ok(entries.into_iter().map(BidAskRate::from).collect())
    }

    #[instrument(name = "NbpCurrencyTableFetch", skip(self))]
    async fn fetch_currency_codes(&self) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/api/exchangerates/tables/a/?format=json", self.base_url);
        let tables: Vec<TableResponse> = self.get_json(&url).await?;
        let codes: Vec<String> = tables
            .into_iter()
            .next()
            .map(|table| table.rates.into_iter().map(|entry| entry.code).collect())
            .unwrap_or_default();
        if codes.is_empty() {
            return Err(FetchError::Empty { url });
        }
        Ok(codes)
    }
}
