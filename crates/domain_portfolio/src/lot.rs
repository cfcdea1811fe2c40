//! Purchase lots

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Units acquired together at one price
///
/// A lot is only ever created by a buy. Sells shrink it or remove it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    /// Units still open
    pub units: Decimal,
    /// Purchase price per unit
    pub price: Decimal,
    /// Trade date of the originating buy
    pub acquired_on: NaiveDate,
}

impl Lot {
    pub fn new(units: Decimal, price: Decimal, acquired_on: NaiveDate) -> Self {
        Self {
            units,
            price,
            acquired_on,
        }
    }

    /// Acquisition cost of the units still open
    pub fn cost(&self) -> Decimal {
        self.units * self.price
    }
}

/// The part of a lot consumed by a sell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotMatch {
    /// Trade date of the lot the units came from
    pub acquired_on: NaiveDate,
    /// Units taken from the lot
    pub units: Decimal,
    /// Purchase price of the lot
    pub price: Decimal,
}

impl LotMatch {
    /// Acquisition cost of the matched units
    pub fn cost(&self) -> Decimal {
        self.units * self.price
    }
}
