//! FIFO lot ledger
//!
//! Each holding (folio + ISIN) owns a queue of open lots, oldest first, and a
//! running unit total. Buys append a lot; sells retire lots from the front of
//! the queue, splitting the last one touched when it is only partly consumed.
//!
//! The running total always equals the sum of open lot units and never goes
//! negative.

use std::collections::{btree_map, BTreeMap, BTreeSet, VecDeque};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use core_kernel::{HoldingKey, Isin};

use crate::error::PortfolioError;
use crate::lot::{Lot, LotMatch};
use crate::transaction::{Transaction, TransactionKind};

/// What to do when a sell exceeds the units held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OversellPolicy {
    /// Retire every open lot and drop the excess units
    #[default]
    Truncate,
    /// Refuse the sell and leave the ledger untouched
    Reject,
}

/// Result of applying one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Zero-unit transaction; nothing changed
    Skipped,
    /// A buy opened this lot
    Opened(Lot),
    /// A sell consumed these lots, oldest first
    Closed {
        matches: Vec<LotMatch>,
        /// Units that had no lot to match (only under `Truncate`)
        unmatched: Decimal,
    },
}

/// Open lots and running unit total for one holding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    lots: VecDeque<Lot>,
    total_units: Decimal,
}

impl Ledger {
    /// Open lots, oldest first
    pub fn lots(&self) -> &VecDeque<Lot> {
        &self.lots
    }

    /// Units currently held
    pub fn total_units(&self) -> Decimal {
        self.total_units
    }

    /// Sum of `units * price` over the open lots
    pub fn acquisition_cost(&self) -> Decimal {
        self.lots.iter().map(Lot::cost).sum()
    }

    /// True when no units are held
    pub fn is_flat(&self) -> bool {
        self.lots.is_empty()
    }

    fn open(&mut self, lot: Lot) {
        self.total_units += lot.units;
        self.lots.push_back(lot);
    }

    /// Retires up to `units` from the oldest lots, returning what matched and
    /// how many units were left over once the queue ran dry
    fn retire(&mut self, units: Decimal) -> (Vec<LotMatch>, Decimal) {
        let mut to_sell = units;
        let mut matches = Vec::new();

        while to_sell > Decimal::ZERO {
            let Some(oldest) = self.lots.front_mut() else {
                break;
            };

            if oldest.units > to_sell {
                oldest.units -= to_sell;
                self.total_units -= to_sell;
                matches.push(LotMatch {
                    acquired_on: oldest.acquired_on,
                    units: to_sell,
                    price: oldest.price,
                });
                to_sell = Decimal::ZERO;
            } else if let Some(emptied) = self.lots.pop_front() {
                to_sell -= emptied.units;
                self.total_units -= emptied.units;
                matches.push(LotMatch {
                    acquired_on: emptied.acquired_on,
                    units: emptied.units,
                    price: emptied.price,
                });
            }
        }

        (matches, to_sell)
    }
}

/// Ledgers for every holding in a portfolio
#[derive(Debug, Clone, Default)]
pub struct LotLedger {
    holdings: BTreeMap<HoldingKey, Ledger>,
    policy: OversellPolicy,
}

impl LotLedger {
    /// Creates an empty ledger with the given over-sell policy
    pub fn new(policy: OversellPolicy) -> Self {
        Self {
            holdings: BTreeMap::new(),
            policy,
        }
    }

    /// Returns the over-sell policy
    pub fn policy(&self) -> OversellPolicy {
        self.policy
    }

    /// Applies one transaction to the ledger of its holding
    ///
    /// Only the transaction's own holding is touched. Under
    /// [`OversellPolicy::Reject`] an over-sell returns
    /// [`PortfolioError::Oversell`] before anything is modified.
    pub fn apply(&mut self, tx: &Transaction) -> Result<Applied, PortfolioError> {
        match tx.kind() {
            TransactionKind::NoOp => {
                debug!(folio = %tx.folio, isin = %tx.isin, "Skipping zero-unit transaction");
                Ok(Applied::Skipped)
            }
            TransactionKind::Buy => {
                let lot = Lot::new(tx.units, tx.price, tx.trade_date);
                self.holdings.entry(tx.key()).or_default().open(lot.clone());
                debug!(
                    folio = %tx.folio,
                    isin = %tx.isin,
                    units = %tx.units,
                    price = %tx.price,
                    "Opened lot"
                );
                Ok(Applied::Opened(lot))
            }
            TransactionKind::Sell => self.sell(tx),
        }
    }

    fn sell(&mut self, tx: &Transaction) -> Result<Applied, PortfolioError> {
        let key = tx.key();
        let requested = tx.units.abs();

        if self.policy == OversellPolicy::Reject {
            let available = self
                .holdings
                .get(&key)
                .map_or(Decimal::ZERO, Ledger::total_units);
            if requested > available {
                warn!(holding = %key, %requested, %available, "Rejected oversell");
                return Err(PortfolioError::Oversell {
                    key,
                    requested,
                    available,
                });
            }
        }

        let ledger = self.holdings.entry(key).or_default();
        let (matches, unmatched) = ledger.retire(requested);

        if unmatched > Decimal::ZERO {
            warn!(
                folio = %tx.folio,
                isin = %tx.isin,
                %requested,
                %unmatched,
                "Sell exceeded units held; excess dropped"
            );
        } else {
            debug!(
                folio = %tx.folio,
                isin = %tx.isin,
                units = %requested,
                lots = matches.len(),
                "Retired lots"
            );
        }

        Ok(Applied::Closed { matches, unmatched })
    }

    /// Applies transactions in order, collecting failures
    ///
    /// A failed transaction is skipped; later transactions, including those
    /// for the same holding, are still applied.
    pub fn apply_all<'a, I>(&mut self, transactions: I) -> Vec<PortfolioError>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .filter_map(|tx| self.apply(tx).err())
            .collect()
    }

    /// Returns the ledger for one holding
    pub fn get(&self, key: &HoldingKey) -> Option<&Ledger> {
        self.holdings.get(key)
    }

    /// Iterates holdings in folio, then ISIN, order
    pub fn iter(&self) -> btree_map::Iter<'_, HoldingKey, Ledger> {
        self.holdings.iter()
    }

    /// Distinct securities across all folios
    pub fn isins(&self) -> BTreeSet<Isin> {
        self.holdings.keys().map(|k| k.isin.clone()).collect()
    }

    /// Number of holdings tracked
    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}

impl<'a> IntoIterator for &'a LotLedger {
    type Item = (&'a HoldingKey, &'a Ledger);
    type IntoIter = btree_map::Iter<'a, HoldingKey, Ledger>;

    fn into_iter(self) -> Self::IntoIter {
        self.holdings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_kernel::Folio;
    use rust_decimal_macros::dec;

    fn folio() -> Folio {
        Folio::new("1001").unwrap()
    }

    fn isin() -> Isin {
        Isin::new("INF209K01YN0").unwrap()
    }

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(u64::from(n))
    }

    fn buy(units: Decimal, price: Decimal, n: u32) -> Transaction {
        Transaction::buy(folio(), isin(), units, price, day(n))
    }

    fn sell(units: Decimal, n: u32) -> Transaction {
        Transaction::sell(folio(), isin(), units, dec!(0), day(n))
    }

    fn key() -> HoldingKey {
        HoldingKey::new(folio(), isin())
    }

    #[test]
    fn test_partial_lot_split() {
        let mut ledger = LotLedger::default();
        ledger.apply(&buy(dec!(10), dec!(100), 0)).unwrap();
        ledger.apply(&buy(dec!(10), dec!(110), 1)).unwrap();

        let applied = ledger.apply(&sell(dec!(15), 2)).unwrap();
        let Applied::Closed { matches, unmatched } = applied else {
            panic!("expected a closing sell");
        };
        assert_eq!(unmatched, Decimal::ZERO);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].units, dec!(10));
        assert_eq!(matches[1].units, dec!(5));

        let holding = ledger.get(&key()).unwrap();
        assert_eq!(holding.lots().len(), 1);
        assert_eq!(holding.lots()[0].units, dec!(5));
        assert_eq!(holding.lots()[0].price, dec!(110));
        assert_eq!(holding.total_units(), dec!(5));
        assert_eq!(holding.acquisition_cost(), dec!(550));
    }

    #[test]
    fn test_exact_lot_consumption_removes_lot() {
        let mut ledger = LotLedger::default();
        ledger.apply(&buy(dec!(10), dec!(100), 0)).unwrap();
        ledger.apply(&sell(dec!(10), 1)).unwrap();

        let holding = ledger.get(&key()).unwrap();
        assert!(holding.is_flat());
        assert_eq!(holding.total_units(), Decimal::ZERO);
    }

    #[test]
    fn test_reject_leaves_ledger_untouched() {
        let mut ledger = LotLedger::new(OversellPolicy::Reject);
        ledger.apply(&buy(dec!(10), dec!(100), 0)).unwrap();

        let err = ledger.apply(&sell(dec!(15), 1)).unwrap_err();
        assert!(matches!(
            err,
            PortfolioError::Oversell { requested, available, .. }
                if requested == dec!(15) && available == dec!(10)
        ));

        let holding = ledger.get(&key()).unwrap();
        assert_eq!(holding.total_units(), dec!(10));
        assert_eq!(holding.lots().len(), 1);
    }

    #[test]
    fn test_reject_on_unknown_holding_creates_nothing() {
        let mut ledger = LotLedger::new(OversellPolicy::Reject);
        assert!(ledger.apply(&sell(dec!(1), 0)).is_err());
        assert!(ledger.is_empty());
    }
}
