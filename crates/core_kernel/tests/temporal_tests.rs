//! Unit tests for trade date parsing

use chrono::NaiveDate;
use core_kernel::temporal::years_between;
use core_kernel::{format_trade_date, parse_trade_date, TemporalError};

#[test]
fn test_statement_format() {
    let date = parse_trade_date("01-Apr-2022").unwrap();
    assert_eq!(date, NaiveDate::from_ymd_opt(2022, 4, 1).unwrap());
}

#[test]
fn test_month_name_is_case_insensitive() {
    let upper = parse_trade_date("01-APR-2022").unwrap();
    let lower = parse_trade_date("01-apr-2022").unwrap();
    assert_eq!(upper, lower);
}

#[test]
fn test_iso_fallback() {
    let date = parse_trade_date("2022-04-01").unwrap();
    assert_eq!(date, NaiveDate::from_ymd_opt(2022, 4, 1).unwrap());
}

#[test]
fn test_surrounding_whitespace_is_ignored() {
    assert!(parse_trade_date(" 01-Apr-2022 ").is_ok());
}

#[test]
fn test_invalid_date_reports_value() {
    let err = parse_trade_date("31-Feb-2022").unwrap_err();
    assert_eq!(
        err,
        TemporalError::InvalidDate {
            value: "31-Feb-2022".to_string()
        }
    );
}

#[test]
fn test_format_pads_day() {
    let date = NaiveDate::from_ymd_opt(2023, 3, 5).unwrap();
    assert_eq!(format_trade_date(date), "05-Mar-2023");
}

#[test]
fn test_years_between_partial_year() {
    let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let to = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
    let years = years_between(from, to);
    assert!((years - 90.0 / 365.0).abs() < 1e-12);
}
