//! Loose JSON scalar parsing
//!
//! Statement exports and NAV feeds are inconsistent about quoting numbers:
//! `"12.5"`, `12.5` and `"1,250.00"` all appear in the wild.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Reads a decimal from a JSON number or numeric string
pub(crate) fn decimal(value: &Value) -> Result<Decimal, String> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|_| format!("{text} is not a decimal"))
        }
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            Decimal::from_str(&cleaned).map_err(|_| format!("{s:?} is not a decimal"))
        }
        other => Err(format!("expected a number, found {other}")),
    }
}

/// Reads an identifier that may have been exported as a number
pub(crate) fn text(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("expected a string, found {other}")),
    }
}
