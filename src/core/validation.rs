//! Request parameter validation
//!
//! Every check runs before the provider is contacted. Each validator stops at the
//! first failed rule.

use crate::core::calendar;
use crate::core::currency::CurrencySet;
use crate::core::error::ValidationError;
use crate::core::rates::QuotationCount;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Optional date rules on top of the format, weekday and past-date checks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidationRules {
    #[serde(default = "default_reject_holidays")]
    pub reject_holidays: bool,
    /// Earliest year the provider has data for. `None` disables the check.
    #[serde(default = "default_data_floor_year")]
    pub data_floor_year: Option<i32>,
}

fn default_reject_holidays() -> bool {
    true
}

fn default_data_floor_year() -> Option<i32> {
    Some(2002)
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            reject_holidays: default_reject_holidays(),
            data_floor_year: default_data_floor_year(),
        }
    }
}

impl ValidationRules {
    /// Format, weekday and past-date checks only.
    pub fn basic() -> Self {
        Self {
            reject_holidays: false,
            data_floor_year: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Validators {
    currencies: Arc<CurrencySet>,
    rules: ValidationRules,
}

impl Validators {
    pub fn new(currencies: Arc<CurrencySet>, rules: ValidationRules) -> Self {
        Self { currencies, rules }
    }

    pub fn currencies(&self) -> &CurrencySet {
        &self.currencies
    }

    /// Returns the uppercased code when it is a member of the currency set.
    pub fn validate_currency(&self, code: &str) -> Result<String, ValidationError> {
        if self.currencies.contains(code) {
            Ok(code.to_uppercase())
        } else {
            Err(ValidationError::InvalidCurrency {
                code: code.to_string(),
                allowed: self.currencies.joined(),
            })
        }
    }

    pub fn validate_date(&self, text: &str) -> Result<NaiveDate, ValidationError> {
        self.validate_date_on(text, Local::now().date_naive())
    }

    /// Checks `text` as if the current date were `today`.
    pub fn validate_date_on(
        &self,
        text: &str,
        today: NaiveDate,
    ) -> Result<NaiveDate, ValidationError> {
        let date = parse_iso_date(text).ok_or(ValidationError::InvalidDateFormat)?;

        if calendar::is_weekend(date) {
            return Err(ValidationError::InvalidWeekday);
        }
        if date > today {
            return Err(ValidationError::FutureDate);
        }
        if let Some(floor_year) = self.rules.data_floor_year {
            if date.year() < floor_year {
                return Err(ValidationError::BeforeDataFloor { floor_year });
            }
        }
        if self.rules.reject_holidays && calendar::is_public_holiday(date) {
            return Err(ValidationError::HolidayDate { date });
        }
        Ok(date)
    }

    pub fn validate_quotation_count(&self, text: &str) -> Result<QuotationCount, ValidationError> {
        validate_quotation_count(text)
    }
}

/// Parses the count as an integer and checks it lies in `1..=255`.
pub fn validate_quotation_count(text: &str) -> Result<QuotationCount, ValidationError> {
    let text = text.trim();
    let value: i64 = text.parse().map_err(|_| {
        if is_integer_literal(text) {
            ValidationError::OutOfRange
        } else {
            ValidationError::NotAnInteger
        }
    })?;
    QuotationCount::new(value).ok_or(ValidationError::OutOfRange)
}

// Integers too wide for i64 still count as integers.
fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// Strict `YYYY-MM-DD`: chrono alone accepts unpadded fields and signed years.
fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}
