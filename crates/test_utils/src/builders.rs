//! Test Data Builders
//!
//! Provides builder patterns for constructing transactions and whole trading
//! scenarios with sensible defaults. Tests specify only the fields they care
//! about.

use chrono::NaiveDate;
use core_kernel::{format_trade_date, Folio, Isin};
use domain_portfolio::Transaction;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use crate::fixtures::{DateFixtures, FolioFixtures, IsinFixtures};

/// Builder for a single transaction
///
/// Defaults to a purchase of 10 units at 100 in the primary folio. Unless an
/// amount is set explicitly, the cash amount follows the investor convention
/// (negative for buys).
pub struct TransactionBuilder {
    folio: Folio,
    isin: Isin,
    units: Decimal,
    price: Decimal,
    trade_date: NaiveDate,
    amount: Option<Decimal>,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::buy()
    }
}

impl TransactionBuilder {
    /// Starts a purchase
    pub fn buy() -> Self {
        Self {
            folio: FolioFixtures::primary(),
            isin: IsinFixtures::absl(),
            units: dec!(10),
            price: dec!(100),
            trade_date: DateFixtures::start(),
            amount: None,
        }
    }

    /// Starts a redemption
    pub fn sell() -> Self {
        Self {
            units: dec!(-10),
            ..Self::buy()
        }
    }

    /// Sets the unit count, keeping the buy/sell direction
    pub fn with_units(mut self, units: Decimal) -> Self {
        self.units = if self.units.is_sign_negative() {
            -units.abs()
        } else {
            units.abs()
        };
        self
    }

    /// Sets a raw signed unit count (zero allowed)
    pub fn with_signed_units(mut self, units: Decimal) -> Self {
        self.units = units;
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.trade_date = date;
        self
    }

    pub fn on_day(self, n: u64) -> Self {
        self.on(DateFixtures::day(n))
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn build(self) -> Transaction {
        let amount = self.amount.unwrap_or(-(self.units * self.price));
        Transaction::new(self.folio, self.isin, self.units, self.price, self.trade_date, amount)
    }
}

/// Builder for an ordered transaction history
///
/// # Example
///
/// ```rust
/// use test_utils::{IsinFixtures, ScenarioBuilder};
/// use rust_decimal_macros::dec;
///
/// let txs = ScenarioBuilder::new()
///     .buy(IsinFixtures::absl(), dec!(10), dec!(100), 0)
///     .sell(IsinFixtures::absl(), dec!(4), dec!(110), 10)
///     .build();
/// assert_eq!(txs.len(), 2);
/// ```
#[derive(Default)]
pub struct ScenarioBuilder {
    folio: Option<Folio>,
    transactions: Vec<Transaction>,
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `folio` for the transactions added after this call
    pub fn in_folio(mut self, folio: Folio) -> Self {
        self.folio = Some(folio);
        self
    }

    fn folio(&self) -> Folio {
        self.folio.clone().unwrap_or_else(FolioFixtures::primary)
    }

    /// Adds a purchase `day` days after the start date
    pub fn buy(mut self, isin: Isin, units: Decimal, price: Decimal, day: u64) -> Self {
        let tx = Transaction::buy(self.folio(), isin, units, price, DateFixtures::day(day));
        self.transactions.push(tx);
        self
    }

    /// Adds a redemption `day` days after the start date
    pub fn sell(mut self, isin: Isin, units: Decimal, price: Decimal, day: u64) -> Self {
        let tx = Transaction::sell(self.folio(), isin, units, price, DateFixtures::day(day));
        self.transactions.push(tx);
        self
    }

    pub fn build(self) -> Vec<Transaction> {
        self.transactions
    }

    /// Renders the scenario as a statement document
    pub fn to_statement_json(&self) -> String {
        let records: Vec<_> = self
            .transactions
            .iter()
            .map(|tx| {
                json!({
                    "folio": tx.folio.as_str(),
                    "isin": tx.isin.as_str(),
                    "trxnUnits": tx.units.to_string(),
                    "purchasePrice": tx.price.to_string(),
                    "trxnDate": format_trade_date(tx.trade_date),
                    "trxnAmount": tx.amount.to_string(),
                })
            })
            .collect();

        json!({ "data": [{ "dtSummary": records }] }).to_string()
    }
}
