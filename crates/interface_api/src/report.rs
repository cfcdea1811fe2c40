//! Plain-text valuation report

use std::fmt::Write;

use rust_decimal::Decimal;

use domain_portfolio::{round_currency, round_units, PortfolioReport};

/// Renders a report in the layout printed by `folio-report`
///
/// ```text
/// Total Portfolio Value: 390.00
/// Total Portfolio Gain: 30.00
/// Portfolio Details:
/// ISIN: INF209K01YN0, Remaining Units: 3, Current Value: 390.00, Gain: 30.00
/// Portfolio XIRR: 21.37%
/// ```
pub fn render(report: &PortfolioReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Total Portfolio Value: {}", money(summary.total_market_value));
    let _ = writeln!(out, "Total Portfolio Gain: {}", money(summary.total_unrealized_gain));
    let _ = writeln!(out, "Portfolio Details:");

    for holding in &summary.holdings {
        let folio = holding
            .folio
            .as_ref()
            .map(|f| format!("Folio: {f}, "))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{folio}ISIN: {}, Remaining Units: {}, Current Value: {}, Gain: {}",
            holding.isin,
            round_units(holding.remaining_units),
            money(holding.market_value),
            money(holding.unrealized_gain),
        );
    }

    match &report.xirr {
        Ok(pct) => {
            let _ = writeln!(out, "Portfolio XIRR: {}%", money(*pct));
        }
        Err(e) => {
            let _ = writeln!(out, "Portfolio XIRR: n/a ({e})");
        }
    }

    if !summary.missing_prices.is_empty() {
        let missing: Vec<String> = summary.missing_prices.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "Valued at zero (no NAV): {}", missing.join(", "));
    }
    for error in &report.ledger_errors {
        let _ = writeln!(out, "Skipped transaction: {error}");
    }

    out
}

fn money(value: Decimal) -> String {
    format!("{:.2}", round_currency(value))
}
