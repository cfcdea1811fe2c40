//! Pre-built Test Fixtures
//!
//! Provides ready-to-use identifiers, dates and statement documents. The
//! ISINs are real fund codes with valid check digits.

use chrono::{Days, NaiveDate};
use core_kernel::{Folio, Isin};

/// Fixture for security identifiers
pub struct IsinFixtures;

impl IsinFixtures {
    /// Aditya Birla Sun Life fund
    pub fn absl() -> Isin {
        Isin::new("INF209K01YN0").unwrap()
    }

    /// HDFC fund
    pub fn hdfc() -> Isin {
        Isin::new("INF179K01BE2").unwrap()
    }

    /// ICICI Prudential fund
    pub fn icici() -> Isin {
        Isin::new("INF109K01Z48").unwrap()
    }

    /// Parag Parikh fund
    pub fn ppfas() -> Isin {
        Isin::new("INF846K01EW2").unwrap()
    }

    /// Every fund fixture
    pub fn all_funds() -> Vec<Isin> {
        vec![Self::absl(), Self::hdfc(), Self::icici(), Self::ppfas()]
    }
}

/// Fixture for folio numbers
pub struct FolioFixtures;

impl FolioFixtures {
    pub fn primary() -> Folio {
        Folio::new("1040567/89").unwrap()
    }

    pub fn secondary() -> Folio {
        Folio::new("2099114").unwrap()
    }
}

/// Fixture for trade dates
pub struct DateFixtures;

impl DateFixtures {
    /// First trade date used by scenarios (Jan 1, 2024)
    pub fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    /// `n` days after [`DateFixtures::start`]
    pub fn day(n: u64) -> NaiveDate {
        Self::start() + Days::new(n)
    }

    /// Valuation date a year after the start
    pub fn year_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
    }
}

/// Fixture for statement documents
pub struct StatementFixtures;

impl StatementFixtures {
    /// Two purchases and a partial redemption of one fund, as exported
    pub fn three_trades() -> &'static str {
        r#"{
  "data": [{
    "dtSummary": [
      {"folio": "1040567/89", "isin": "INF209K01YN0", "trxnUnits": "10.000",
       "purchasePrice": "100.00", "trxnDate": "01-Jan-2024", "trxnAmount": "-1000.00"},
      {"folio": "1040567/89", "isin": "INF209K01YN0", "trxnUnits": "5.000",
       "purchasePrice": "120.00", "trxnDate": "30-Jan-2024", "trxnAmount": "-600.00"},
      {"folio": "1040567/89", "isin": "INF209K01YN0", "trxnUnits": "-12.000",
       "purchasePrice": "125.00", "trxnDate": "29-Feb-2024", "trxnAmount": "1500.00"}
    ]
  }]
}"#
    }

    /// A statement whose second record has no unit count
    pub fn missing_units() -> &'static str {
        r#"{"data":[{"dtSummary":[
  {"folio":"1","isin":"INF209K01YN0","trxnUnits":"1","purchasePrice":"10","trxnDate":"01-Jan-2024","trxnAmount":"-10"},
  {"folio":"1","isin":"INF209K01YN0","purchasePrice":"10","trxnDate":"02-Jan-2024","trxnAmount":"-10"}
]}]}"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fund_isins_are_well_formed() {
        for isin in IsinFixtures::all_funds() {
            assert!(isin.is_well_formed(), "{isin} should pass the check digit");
        }
    }

    #[test]
    fn test_day_offsets() {
        assert_eq!(DateFixtures::day(0), DateFixtures::start());
        assert_eq!(DateFixtures::day(31), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }
}
