//! Rate records and the upstream rate source abstraction

use crate::core::error::FetchError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One published mid-market rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidRate {
    pub effective_date: NaiveDate,
    pub mid: f64,
}

/// One published buy/sell quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidAskRate {
    pub effective_date: NaiveDate,
    pub bid: f64,
    pub ask: f64,
}

impl BidAskRate {
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }
}

/// Chronological series of quotations for one currency, in the order the
/// provider returned them.
pub type RateSeries<T> = Vec<T>;

/// Validated number of trailing quotations, always in `1..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct QuotationCount(u8);

impl QuotationCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 255;

    pub fn new(value: i64) -> Option<Self> {
        if value < i64::from(Self::MIN) || value > i64::from(Self::MAX) {
            return None;
        }
        u8::try_from(value).ok().map(Self)
    }

    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl std::fmt::Display for QuotationCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upstream provider of published exchange rates.
///
/// Each call is a single request: implementations neither retry nor cache.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// All mid rates published for `currency` on `date`.
    async fn fetch_average_rate_series(
        &self,
        currency: &str,
        date: NaiveDate,
    ) -> Result<RateSeries<MidRate>, FetchError>;

    /// The `count` most recent mid rates for `currency`.
    async fn fetch_last_n_average_series(
        &self,
        currency: &str,
        count: QuotationCount,
    ) -> Result<RateSeries<MidRate>, FetchError>;

    /// The `count` most recent bid/ask quotations for `currency`.
    async fn fetch_last_n_bid_ask_series(
        &self,
        currency: &str,
        count: QuotationCount,
    ) -> Result<RateSeries<BidAskRate>, FetchError>;

    /// Codes of every currency the provider currently publishes mid rates for.
    async fn fetch_currency_codes(&self) -> Result<Vec<String>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotation_count_bounds() {
        assert!(QuotationCount::new(0).is_none());
        assert!(QuotationCount::new(-3).is_none());
        assert!(QuotationCount::new(256).is_none());
        assert_eq!(QuotationCount::new(1).map(QuotationCount::get), Some(1));
        assert_eq!(QuotationCount::new(255).map(QuotationCount::get), Some(255));
    }

    #[test]
    fn test_spread() {
        let quote = BidAskRate {
            effective_date: NaiveDate::from_ymd_opt(2023, 4, 21).unwrap(),
            bid: 1.15,
            ask: 1.20,
        };
        assert!((quote.spread() - 0.05).abs() < 1e-9);
    }
}
