//! Portfolio domain services
//!
//! `PortfolioService` runs the whole valuation: ledger construction, price
//! lookup, summary, and return.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::PortfolioError;
use crate::ledger::LotLedger;
use crate::nav::PriceBook;
use crate::ports::{fetch_latest_navs, PriceFailure, PriceSource};
use crate::returns::{self, ReturnError};
use crate::settings::ValuationSettings;
use crate::transaction::Transaction;
use crate::valuation::{summarize, PortfolioSummary};

/// Everything a valuation run produced
#[derive(Debug)]
pub struct PortfolioReport {
    /// Date the valuation and terminal cash flow refer to
    pub as_of: NaiveDate,
    pub summary: PortfolioSummary,
    /// XIRR as a percentage, or why it could not be computed
    pub xirr: Result<Decimal, ReturnError>,
    /// Transactions the ledger refused
    pub ledger_errors: Vec<PortfolioError>,
    /// NAV lookups that failed
    pub price_failures: Vec<PriceFailure>,
}

/// Service for valuing a portfolio from its transaction history
///
/// Ledgers are built fresh for every call; the service holds no portfolio
/// state of its own.
pub struct PortfolioService {
    prices: Arc<dyn PriceSource>,
    settings: ValuationSettings,
}

impl PortfolioService {
    /// Creates a service backed by the given price source
    pub fn new(prices: Arc<dyn PriceSource>, settings: ValuationSettings) -> Self {
        Self { prices, settings }
    }

    /// Returns the active settings
    pub fn settings(&self) -> &ValuationSettings {
        &self.settings
    }

    /// Builds the FIFO ledger for a transaction history
    ///
    /// Transactions the ledger refuses are returned alongside it; they do not
    /// stop the remaining transactions from being applied.
    pub fn build_ledger(&self, transactions: &[Transaction]) -> (LotLedger, Vec<PortfolioError>) {
        let mut ledger = LotLedger::new(self.settings.oversell);
        let errors = ledger.apply_all(transactions);
        for error in &errors {
            warn!(%error, "Transaction not applied");
        }
        (ledger, errors)
    }

    /// Values a portfolio, fetching every NAV from the price source
    pub async fn evaluate(&self, transactions: &[Transaction], as_of: NaiveDate) -> PortfolioReport {
        self.evaluate_with_prices(transactions, PriceBook::new(), as_of).await
    }

    /// Values a portfolio using `known` prices where given and the price
    /// source for the rest
    ///
    /// This method:
    /// 1. Builds the FIFO ledger
    /// 2. Looks up NAVs the caller did not supply, concurrently
    /// 3. Summarises holdings, valuing missing prices at zero
    /// 4. Computes XIRR over the transaction cash flows
    pub async fn evaluate_with_prices(
        &self,
        transactions: &[Transaction],
        known: PriceBook,
        as_of: NaiveDate,
    ) -> PortfolioReport {
        let (ledger, ledger_errors) = self.build_ledger(transactions);

        let wanted: Vec<_> = ledger
            .isins()
            .into_iter()
            .filter(|isin| !known.contains(isin))
            .collect();

        let mut prices = known;
        let mut price_failures = Vec::new();
        if !wanted.is_empty() {
            let fetch = fetch_latest_navs(self.prices.as_ref(), wanted, self.settings.price_concurrency).await;
            prices.fill_from(fetch.prices);
            price_failures = fetch.failures;
        }

        let summary = summarize(&ledger, &prices, self.settings.grouping);

        let flows = returns::close_series(
            returns::cash_flows(transactions, self.settings.cash_flow_convention),
            self.settings.terminal_flow,
            summary.total_market_value,
            as_of,
        );
        let xirr = returns::xirr_percent(&flows);
        if let Err(e) = &xirr {
            warn!(error = %e, "XIRR unavailable");
        }

        info!(
            holdings = summary.holdings.len(),
            total_value = %summary.total_market_value,
            total_gain = %summary.total_unrealized_gain,
            missing_prices = summary.missing_prices.len(),
            "Portfolio valued"
        );

        PortfolioReport {
            as_of,
            summary,
            xirr,
            ledger_errors,
            price_failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use core_kernel::{DomainPort, Folio, HoldingKey, Isin, PortError};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    use crate::ledger::OversellPolicy;
    use crate::nav::Nav;

    struct FixedPrices(HashMap<Isin, Decimal>);

    impl DomainPort for FixedPrices {}

    #[async_trait]
    impl PriceSource for FixedPrices {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn latest_nav(&self, isin: &Isin) -> Result<Nav, PortError> {
            self.0
                .get(isin)
                .map(|v| Nav::new(isin.clone(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), *v))
                .ok_or_else(|| PortError::not_found("Nav", isin))
        }
    }

    fn isin() -> Isin {
        Isin::new("INF209K01YN0").unwrap()
    }

    fn folio() -> Folio {
        Folio::new("1001").unwrap()
    }

    fn day(n: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(n)
    }

    fn service(prices: &[(Isin, Decimal)], settings: ValuationSettings) -> PortfolioService {
        let source = FixedPrices(prices.iter().cloned().collect());
        PortfolioService::new(Arc::new(source), settings)
    }

    fn scenario() -> Vec<Transaction> {
        vec![
            Transaction::buy(folio(), isin(), dec!(10), dec!(100), day(0)),
            Transaction::buy(folio(), isin(), dec!(5), dec!(120), day(29)),
            Transaction::sell(folio(), isin(), dec!(12), dec!(125), day(59)),
        ]
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let svc = service(&[(isin(), dec!(130))], ValuationSettings::default());
        let report = svc.evaluate(&scenario(), day(90)).await;

        let (ledger, _) = svc.build_ledger(&scenario());
        let holding = ledger.get(&HoldingKey::new(folio(), isin())).unwrap();
        assert_eq!(holding.lots().len(), 1);
        assert_eq!(holding.lots()[0].units, dec!(3));
        assert_eq!(holding.lots()[0].price, dec!(120));

        assert_eq!(report.summary.total_acquisition_cost, dec!(360));
        assert_eq!(report.summary.total_market_value, dec!(390));
        assert_eq!(report.summary.total_unrealized_gain, dec!(30));
        assert!(report.xirr.is_ok());
        assert!(report.ledger_errors.is_empty());
        assert!(report.price_failures.is_empty());
    }

    #[tokio::test]
    async fn test_failed_lookup_values_at_zero() {
        let svc = service(&[], ValuationSettings::default());
        let report = svc.evaluate(&scenario(), day(90)).await;

        assert_eq!(report.summary.total_market_value, Decimal::ZERO);
        assert_eq!(report.summary.total_unrealized_gain, dec!(-360));
        assert_eq!(report.summary.missing_prices, vec![isin()]);
        assert_eq!(report.price_failures.len(), 1);
    }

    #[tokio::test]
    async fn test_known_prices_take_precedence() {
        let svc = service(&[(isin(), dec!(130))], ValuationSettings::default());
        let known = PriceBook::from_iter([(isin(), dec!(200))]);
        let report = svc.evaluate_with_prices(&scenario(), known, day(90)).await;

        assert_eq!(report.summary.total_market_value, dec!(600));
    }

    #[tokio::test]
    async fn test_rejected_oversell_is_reported() {
        let settings = ValuationSettings::default().with_oversell(OversellPolicy::Reject);
        let svc = service(&[(isin(), dec!(130))], settings);
        let txs = vec![
            Transaction::buy(folio(), isin(), dec!(10), dec!(100), day(0)),
            Transaction::sell(folio(), isin(), dec!(15), dec!(110), day(1)),
        ];

        let report = svc.evaluate(&txs, day(30)).await;
        assert_eq!(report.ledger_errors.len(), 1);
        assert_eq!(report.summary.total_market_value, dec!(1300));
    }

    #[tokio::test]
    async fn test_empty_history() {
        let svc = service(&[], ValuationSettings::default());
        let report = svc.evaluate(&[], day(0)).await;

        assert!(report.summary.is_empty());
        assert_eq!(report.xirr, Err(ReturnError::NoSignChange));
    }
}
