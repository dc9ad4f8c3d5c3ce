//! Core business logic abstractions

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod rates;
pub mod validation;

// Re-export main types for cleaner imports
pub use currency::CurrencySet;
pub use error::{AggregationError, FetchError, ServiceError, ValidationError};
pub use rates::{BidAskRate, MidRate, QuotationCount, RateSeries, RateSource};
pub use validation::{ValidationRules, Validators};
