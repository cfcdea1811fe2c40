//! Trade date handling
//!
//! Account statements carry dates as `15-Jan-2024`. This module parses that
//! format (falling back to ISO `2024-01-15`) and provides the day-count used
//! when discounting cash flows.

use chrono::NaiveDate;
use thiserror::Error;

/// Statement date format: day, abbreviated month name, four-digit year
pub const TRADE_DATE_FORMAT: &str = "%d-%b-%Y";

/// Day-count basis for annualising intervals (Actual/365)
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Errors related to temporal operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid date {value:?}: expected DD-Mon-YYYY or YYYY-MM-DD")]
    InvalidDate { value: String },
}

/// Parses a statement trade date
///
/// Accepts `15-Jan-2024` (month name in any case) and ISO `2024-01-15`.
///
/// # Example
///
/// ```rust
/// use core_kernel::parse_trade_date;
/// use chrono::NaiveDate;
///
/// let date = parse_trade_date("05-Mar-2023").unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(2023, 3, 5).unwrap());
/// ```
pub fn parse_trade_date(value: &str) -> Result<NaiveDate, TemporalError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, TRADE_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map_err(|_| TemporalError::InvalidDate {
            value: value.to_string(),
        })
}

/// Formats a date in statement style (`05-Mar-2023`)
pub fn format_trade_date(date: NaiveDate) -> String {
    date.format(TRADE_DATE_FORMAT).to_string()
}

/// Returns the signed number of years from `from` to `to` on an Actual/365 basis
pub fn years_between(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64 / DAYS_PER_YEAR
}
