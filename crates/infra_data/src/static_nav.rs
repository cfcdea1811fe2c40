//! Fixed NAV price source
//!
//! Serves prices from a JSON object of the form `{"INF209K01YN0": 15.45, ...}`.
//! Values may be numbers or numeric strings. Every price is stamped with the
//! date given at construction since the file carries none.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use core_kernel::{DomainPort, Isin, PortError};
use domain_portfolio::{Nav, PriceBook, PriceSource};

use crate::error::SourceError;
use crate::values;

const SOURCE_NAME: &str = "static";

/// Price source over a fixed map of NAVs
#[derive(Debug, Clone)]
pub struct StaticNavSource {
    prices: HashMap<Isin, Decimal>,
    nav_date: NaiveDate,
}

impl StaticNavSource {
    /// Creates a source from known prices
    pub fn new(prices: impl IntoIterator<Item = (Isin, Decimal)>, nav_date: NaiveDate) -> Self {
        Self {
            prices: prices.into_iter().collect(),
            nav_date,
        }
    }

    /// Parses a `{ "<ISIN>": nav }` document
    pub fn from_json(json: &str, nav_date: NaiveDate) -> Result<Self, SourceError> {
        let raw: HashMap<String, Value> = serde_json::from_str(json)?;

        let mut prices = HashMap::with_capacity(raw.len());
        for (code, value) in raw {
            let price_error = |message: String| SourceError::Price {
                isin: code.clone(),
                message,
            };
            let isin = Isin::new(&code).map_err(|e| price_error(e.to_string()))?;
            let nav = values::decimal(&value).map_err(price_error)?;
            if nav.is_sign_negative() {
                return Err(price_error(format!("negative NAV {nav}")));
            }
            prices.insert(isin, nav);
        }

        Ok(Self { prices, nav_date })
    }

    /// Reads a NAV file
    pub fn from_path(path: impl AsRef<Path>, nav_date: NaiveDate) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SourceError::io(path, e))?;
        Self::from_json(&text, nav_date)
    }

    /// All prices as a price book
    pub fn price_book(&self) -> PriceBook {
        self.prices.iter().map(|(isin, nav)| (isin.clone(), *nav)).collect()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl DomainPort for StaticNavSource {}

#[async_trait]
impl PriceSource for StaticNavSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn latest_nav(&self, isin: &Isin) -> Result<Nav, PortError> {
        debug!(%isin, "Looking up static NAV");
        self.prices
            .get(isin)
            .map(|value| Nav::new(isin.clone(), self.nav_date, *value).with_source(SOURCE_NAME))
            .ok_or_else(|| PortError::not_found("Nav", isin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[tokio::test]
    async fn test_lookup_known_and_unknown() {
        let source = StaticNavSource::from_json(r#"{"INF209K01YN0": 15.45, "inf179k01be2": "812.3"}"#, date()).unwrap();
        assert_eq!(source.len(), 2);

        let nav = source.latest_nav(&Isin::new("INF179K01BE2").unwrap()).await.unwrap();
        assert_eq!(nav.value, dec!(812.3));
        assert_eq!(nav.nav_date, date());
        assert_eq!(nav.source.as_deref(), Some("static"));

        let missing = source.latest_nav(&Isin::new("INF109K01Z48").unwrap()).await;
        assert!(missing.unwrap_err().is_not_found());
    }

    #[test]
    fn test_rejects_non_numeric_price() {
        let err = StaticNavSource::from_json(r#"{"INF209K01YN0": "n/a"}"#, date()).unwrap_err();
        assert!(matches!(err, SourceError::Price { .. }));
    }

    #[test]
    fn test_rejects_negative_price() {
        assert!(StaticNavSource::from_json(r#"{"INF209K01YN0": -1}"#, date()).is_err());
    }
}
