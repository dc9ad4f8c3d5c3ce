//! Error taxonomy for rate queries

use thiserror::Error;

/// Rejected request input. Raised before any upstream request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid currency {code}, must be one of [{allowed}].")]
    InvalidCurrency { code: String, allowed: String },
    #[error("Invalid date format, should be YYYY-MM-DD.")]
    InvalidDateFormat,
    #[error("Invalid date, should be a weekday.")]
    InvalidWeekday,
    #[error("Invalid date, should be a past date.")]
    FutureDate,
    #[error("Invalid date, data is available from {floor_year} onwards.")]
    BeforeDataFloor { floor_year: i32 },
    #[error("Invalid date, {date} is a public holiday.")]
    HolidayDate { date: chrono::NaiveDate },
    #[error("Invalid number of quotations, should be an integer.")]
    NotAnInteger,
    #[error("Invalid number of quotations, should be between 1 and 255 inclusive.")]
    OutOfRange,
}

/// Failure to obtain a usable rate series from the upstream provider.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-success status, transport failure or timeout. `status` is absent when
    /// no response was received.
    #[error("Failed to fetch data from {url}: {}", describe_failure(.status, .body))]
    UpstreamUnavailable {
        url: String,
        status: Option<u16>,
        body: String,
    },
    #[error("No exchange rates found at {url}")]
    Empty { url: String },
    #[error("Failed to parse response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

fn describe_failure(status: &Option<u16>, body: &str) -> String {
    match status {
        Some(code) if body.is_empty() => code.to_string(),
        Some(code) => format!("{code} {body}"),
        None => body.to_string(),
    }
}

impl FetchError {
    /// True when the provider answered but has nothing for these inputs.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            FetchError::Empty { .. }
                | FetchError::UpstreamUnavailable {
                    status: Some(404),
                    ..
                }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error("Cannot aggregate an empty rate series")]
    EmptySeries,
}

/// Any failure of a complete rate query.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}
