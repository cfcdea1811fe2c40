//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for ledgers and summaries that give
//! more meaningful error messages than standard assertions.

use core_kernel::HoldingKey;
use domain_portfolio::{LotLedger, PortfolioSummary};
use rust_decimal::Decimal;

/// Asserts the ledger invariants for every holding
///
/// # Panics
///
/// Panics if a holding's running total differs from the sum of its lot
/// units, if a total is negative, or if an open lot has no units.
pub fn assert_ledger_consistent(ledger: &LotLedger) {
    for (key, holding) in ledger {
        let lot_sum: Decimal = holding.lots().iter().map(|l| l.units).sum();
        assert_eq!(
            holding.total_units(),
            lot_sum,
            "{key}: running total {} differs from lot sum {lot_sum}",
            holding.total_units()
        );
        assert!(
            holding.total_units() >= Decimal::ZERO,
            "{key}: negative unit total {}",
            holding.total_units()
        );
        assert!(
            holding.lots().iter().all(|l| l.units > Decimal::ZERO),
            "{key}: empty lot left in queue"
        );
    }
}

/// Asserts the units held for one key
pub fn assert_units(ledger: &LotLedger, key: &HoldingKey, expected: Decimal) {
    let actual = ledger.get(key).map_or(Decimal::ZERO, |h| h.total_units());
    assert_eq!(actual, expected, "{key}: expected {expected} units, found {actual}");
}

/// Asserts that summary totals equal the sums of its holdings
pub fn assert_totals_consistent(summary: &PortfolioSummary) {
    let value: Decimal = summary.holdings.iter().map(|h| h.market_value).sum();
    let cost: Decimal = summary.holdings.iter().map(|h| h.acquisition_cost).sum();
    let gain: Decimal = summary.holdings.iter().map(|h| h.unrealized_gain).sum();

    assert_eq!(summary.total_market_value, value, "market value total mismatch");
    assert_eq!(summary.total_acquisition_cost, cost, "acquisition cost total mismatch");
    assert_eq!(summary.total_unrealized_gain, gain, "gain total mismatch");
    assert_eq!(
        summary.total_unrealized_gain,
        summary.total_market_value - summary.total_acquisition_cost,
        "gain is not value minus cost"
    );
}

/// Asserts that two decimals are within `tolerance` of each other
pub fn assert_decimal_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "values differ by more than tolerance: actual={actual}, expected={expected}, diff={diff}, tolerance={tolerance}"
    );
}
