//! Portfolio Domain
//!
//! This crate values a mutual-fund portfolio from its transaction history:
//! FIFO lot matching per holding, valuation at current NAVs, and the
//! money-weighted return (XIRR) of the resulting cash flows.
//!
//! # Key Concepts
//!
//! - **Transaction**: A signed unit movement (buy > 0, sell < 0) in one folio and ISIN
//! - **Lot**: Units bought together at one price, retired oldest-first by sells
//! - **Ledger**: The open lots and running unit total of one holding
//! - **NAV**: Net Asset Value per unit, supplied by a price source
//! - **XIRR**: Annualised rate that zeroes the discounted cash flows
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use core_kernel::{Folio, Isin};
//! use domain_portfolio::{summarize, Grouping, LotLedger, PriceBook, Transaction};
//! use rust_decimal_macros::dec;
//!
//! let folio = Folio::new("1001").unwrap();
//! let isin = Isin::new("INF209K01YN0").unwrap();
//! let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!
//! let mut ledger = LotLedger::default();
//! ledger.apply(&Transaction::buy(folio.clone(), isin.clone(), dec!(10), dec!(100), day)).unwrap();
//! ledger.apply(&Transaction::sell(folio, isin.clone(), dec!(4), dec!(110), day)).unwrap();
//!
//! let prices = PriceBook::from_iter([(isin, dec!(120))]);
//! let summary = summarize(&ledger, &prices, Grouping::BySecurity);
//! assert_eq!(summary.total_market_value, dec!(720));
//! assert_eq!(summary.total_unrealized_gain, dec!(120));
//! ```

pub mod transaction;
pub mod lot;
pub mod ledger;
pub mod nav;
pub mod valuation;
pub mod returns;
pub mod ports;
pub mod settings;
pub mod service;
pub mod error;

pub use transaction::{Transaction, TransactionKind};
pub use lot::{Lot, LotMatch};
pub use ledger::{Applied, Ledger, LotLedger, OversellPolicy};
pub use nav::{Nav, NavHistory, PriceBook};
pub use valuation::{summarize, Grouping, HoldingSummary, PortfolioSummary};
pub use returns::{CashFlow, CashFlowConvention, ReturnError, TerminalFlow};
pub use ports::{fetch_latest_navs, NavFetch, PriceFailure, PriceSource, TransactionSource};
pub use settings::ValuationSettings;
pub use service::{PortfolioReport, PortfolioService};
pub use error::PortfolioError;

use rust_decimal::Decimal;

/// Standard unit precision for display (fund houses report 3-4 places)
pub const UNIT_PRECISION: u32 = 4;

/// Currency precision for display
pub const CURRENCY_PRECISION: u32 = 2;

/// Rounds a unit quantity to display precision
pub fn round_units(value: Decimal) -> Decimal {
    value.round_dp(UNIT_PRECISION)
}

/// Rounds a monetary amount to display precision
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp(CURRENCY_PRECISION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_units() {
        assert_eq!(round_units(dec!(64.7249187)), dec!(64.7249));
    }

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(dec!(1000.005)), dec!(1000.00));
        assert_eq!(round_currency(dec!(-30.456)), dec!(-30.46));
    }
}
