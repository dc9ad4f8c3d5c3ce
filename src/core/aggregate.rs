//! Reductions over fetched rate series

use crate::core::error::AggregationError;
use crate::core::rates::{BidAskRate, MidRate};

/// Arithmetic mean of the mid rates.
pub fn average_mid(series: &[MidRate]) -> Result<f64, AggregationError> {
    if series.is_empty() {
        return Err(AggregationError::EmptySeries);
    }
    let total: f64 = series.iter().map(|rate| rate.mid).sum();
    Ok(total / series.len() as f64)
}

/// Lowest and highest mid rate among the first `limit` records.
///
/// Records past `limit` are ignored even if the provider returned more.
pub fn min_max_mid(series: &[MidRate], limit: usize) -> Result<(f64, f64), AggregationError> {
    series
        .iter()
        .take(limit)
        .map(|rate| rate.mid)
        .fold(None, |acc: Option<(f64, f64)>, mid| match acc {
            None => Some((mid, mid)),
            Some((min, max)) => Some((min.min(mid), max.max(mid))),
        })
        .ok_or(AggregationError::EmptySeries)
}

/// Largest `ask - bid` in the series, never below zero.
///
/// The running maximum starts at `0.0`, so an empty series or one where no
/// quotation has a positive spread yields `0.0`.
pub fn max_bid_ask_spread(series: &[BidAskRate]) -> f64 {
    series
        .iter()
        .map(BidAskRate::spread)
        .fold(0.0, |max, spread| if spread > max { spread } else { max })
}
