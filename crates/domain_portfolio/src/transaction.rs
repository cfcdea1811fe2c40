//! Portfolio transactions

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Folio, HoldingKey, Isin};

/// Direction of a transaction, derived from the sign of its units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Units acquired; opens a lot
    Buy,
    /// Units redeemed; retires lots oldest-first
    Sell,
    /// Zero units; leaves every ledger untouched
    NoOp,
}

/// An immutable transaction record
///
/// `amount` is the cash amount as carried by the source. Records built with
/// [`Transaction::buy`] and [`Transaction::sell`] use the investor's
/// perspective: negative for money paid in, positive for money received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Account the units are held in
    pub folio: Folio,
    /// Security identifier
    pub isin: Isin,
    /// Signed units (positive for buys, negative for sells)
    pub units: Decimal,
    /// Price per unit at execution
    pub price: Decimal,
    /// Trade date
    pub trade_date: NaiveDate,
    /// Cash amount
    pub amount: Decimal,
}

impl Transaction {
    /// Creates a transaction from raw fields
    pub fn new(
        folio: Folio,
        isin: Isin,
        units: Decimal,
        price: Decimal,
        trade_date: NaiveDate,
        amount: Decimal,
    ) -> Self {
        Self {
            folio,
            isin,
            units,
            price,
            trade_date,
            amount,
        }
    }

    /// Creates a purchase of `units` at `price`, paying `units * price`
    pub fn buy(folio: Folio, isin: Isin, units: Decimal, price: Decimal, trade_date: NaiveDate) -> Self {
        let units = units.abs();
        Self::new(folio, isin, units, price, trade_date, -(units * price))
    }

    /// Creates a redemption of `units` at `price`, receiving `units * price`
    pub fn sell(folio: Folio, isin: Isin, units: Decimal, price: Decimal, trade_date: NaiveDate) -> Self {
        let units = units.abs();
        Self::new(folio, isin, -units, price, trade_date, units * price)
    }

    /// Overrides the cash amount
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    /// Returns the direction of the transaction
    pub fn kind(&self) -> TransactionKind {
        if self.units.is_zero() {
            TransactionKind::NoOp
        } else if self.units.is_sign_positive() {
            TransactionKind::Buy
        } else {
            TransactionKind::Sell
        }
    }

    /// Returns the ledger key this transaction belongs to
    pub fn key(&self) -> HoldingKey {
        HoldingKey::new(self.folio.clone(), self.isin.clone())
    }
}
