//! Valuation engine
//!
//! Reads a [`LotLedger`] and a [`PriceBook`] and produces independent summary
//! values; the ledger is never modified.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Folio, Isin};

use crate::ledger::{Ledger, LotLedger};
use crate::nav::PriceBook;

/// How per-holding figures are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// One summary per ISIN, summing every folio that holds it
    #[default]
    BySecurity,
    /// One summary per folio and ISIN
    ByHolding,
}

/// Derived view of one holding (or one security across folios)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingSummary {
    /// Folio, when grouped by holding
    pub folio: Option<Folio>,
    pub isin: Isin,
    pub remaining_units: Decimal,
    /// Sum of open lot units times lot price
    pub acquisition_cost: Decimal,
    /// Price used for valuation; `None` when the price book had no entry
    pub current_price: Option<Decimal>,
    pub market_value: Decimal,
    pub unrealized_gain: Decimal,
    pub open_lots: usize,
}

impl HoldingSummary {
    fn from_ledger(folio: Option<Folio>, isin: Isin, ledger: &Ledger, price: Option<Decimal>) -> Self {
        let remaining_units = ledger.total_units();
        let acquisition_cost = ledger.acquisition_cost();
        let market_value = remaining_units * price.unwrap_or(Decimal::ZERO);

        Self {
            folio,
            isin,
            remaining_units,
            acquisition_cost,
            current_price: price,
            market_value,
            unrealized_gain: market_value - acquisition_cost,
            open_lots: ledger.lots().len(),
        }
    }

    fn absorb(&mut self, other: HoldingSummary) {
        self.remaining_units += other.remaining_units;
        self.acquisition_cost += other.acquisition_cost;
        self.market_value += other.market_value;
        self.unrealized_gain += other.unrealized_gain;
        self.open_lots += other.open_lots;
    }
}

/// Aggregate of every holding summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub holdings: Vec<HoldingSummary>,
    pub total_market_value: Decimal,
    pub total_acquisition_cost: Decimal,
    pub total_unrealized_gain: Decimal,
    /// Securities valued at zero because no price was available
    pub missing_prices: Vec<Isin>,
}

impl PortfolioSummary {
    /// Finds the summary for a security (first match when grouped by holding)
    pub fn holding(&self, isin: &Isin) -> Option<&HoldingSummary> {
        self.holdings.iter().find(|h| &h.isin == isin)
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}

/// Values every ledger at the given prices
///
/// A security missing from `prices` is valued at zero, so its gain is the
/// negative of its acquisition cost. Totals are the same under either
/// grouping.
pub fn summarize(ledger: &LotLedger, prices: &PriceBook, grouping: Grouping) -> PortfolioSummary {
    let mut holdings: Vec<HoldingSummary> = Vec::with_capacity(ledger.len());
    let mut by_isin: BTreeMap<Isin, usize> = BTreeMap::new();

    for (key, holding) in ledger {
        let price = prices.get(&key.isin);

        match grouping {
            Grouping::ByHolding => holdings.push(HoldingSummary::from_ledger(
                Some(key.folio.clone()),
                key.isin.clone(),
                holding,
                price,
            )),
            Grouping::BySecurity => {
                let summary = HoldingSummary::from_ledger(None, key.isin.clone(), holding, price);
                match by_isin.get(&key.isin) {
                    Some(&at) => holdings[at].absorb(summary),
                    None => {
                        by_isin.insert(key.isin.clone(), holdings.len());
                        holdings.push(summary);
                    }
                }
            }
        }
    }

    if grouping == Grouping::BySecurity {
        holdings.sort_by(|a, b| a.isin.cmp(&b.isin));
    }

    let missing_prices: Vec<Isin> = holdings
        .iter()
        .filter(|h| h.current_price.is_none())
        .map(|h| h.isin.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    PortfolioSummary {
        total_market_value: holdings.iter().map(|h| h.market_value).sum(),
        total_acquisition_cost: holdings.iter().map(|h| h.acquisition_cost).sum(),
        total_unrealized_gain: holdings.iter().map(|h| h.unrealized_gain).sum(),
        holdings,
        missing_prices,
    }
}
