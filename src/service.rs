//! The three rate queries: validate, fetch once, reduce.

use crate::core::aggregate;
use crate::core::error::ServiceError;
use crate::core::rates::{QuotationCount, RateSource};
use crate::core::validation::Validators;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageRate {
    pub currency: String,
    pub date: NaiveDate,
    pub average_exchange_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinMaxAverage {
    pub currency: String,
    pub quotations: QuotationCount,
    pub min_average: f64,
    pub max_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MajorDifference {
    pub currency: String,
    pub quotations: QuotationCount,
    #[serde(rename = "major difference")]
    pub major_difference: f64,
}

/// Runs validated, single-fetch rate queries against a [`RateSource`].
#[derive(Clone)]
pub struct RateService {
    validators: Validators,
    source: Arc<dyn RateSource>,
}

impl RateService {
    pub fn new(validators: Validators, source: Arc<dyn RateSource>) -> Self {
        Self { validators, source }
    }

    pub fn validators(&self) -> &Validators {
        &self.validators
    }

    /// Average mid rate of every table published for `currency` on `date`.
    #[instrument(skip(self))]
    pub async fn average_rate(&self, currency: &str, date: &str) -> Result<AverageRate, ServiceError> {
        let currency = self.validators.validate_currency(currency)?;
        let date = self.validators.validate_date(date)?;
        let series = self.source.fetch_average_rate_series(&currency, date).await?;
        let average_exchange_rate = aggregate::average_mid(&series)?;
        debug!(records = series.len(), average_exchange_rate, "Computed average rate");
        Ok(AverageRate {
            currency,
            date,
            average_exchange_rate,
        })
    }

    /// Lowest and highest mid rate over the last `quotations` publications.
    #[instrument(skip(self))]
    pub async fn min_max_average(
        &self,
        currency: &str,
        quotations: &str,
    ) -> Result<MinMaxAverage, ServiceError> {
        let quotations = self.validators.validate_quotation_count(quotations)?;
        let currency = self.validators.validate_currency(currency)?;
        let series = self
            .source
            .fetch_last_n_average_series(&currency, quotations)
            .await?;
        let (min_average, max_average) = aggregate::min_max_mid(&series, quotations.get())?;
        Ok(MinMaxAverage {
            currency,
            quotations,
            min_average,
            max_average,
        })
    }

    /// Largest ask/bid difference over the last `quotations` publications.
    #[instrument(skip(self))]
    pub async fn major_difference(
        &self,
        currency: &str,
        quotations: &str,
    ) -> Result<MajorDifference, ServiceError> {
        let currency = self.validators.validate_currency(currency)?;
        let quotations = self.validators.validate_quotation_count(quotations)?;
        let series = self
            .source
            .fetch_last_n_bid_ask_series(&currency, quotations)
            .await?;
        Ok(MajorDifference {
            currency,
            quotations,
            major_difference: aggregate::max_bid_ask_spread(&series),
        })
    }
}
