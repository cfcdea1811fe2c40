//! Net Asset Value (NAV) prices
//!
//! Price sources return [`Nav`] points; the valuation engine reads a flat
//! [`PriceBook`] of the latest value per ISIN.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::Isin;

/// A single NAV price point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nav {
    /// Security the price is for
    pub isin: Isin,
    /// Date of the NAV
    pub nav_date: NaiveDate,
    /// NAV value per unit
    pub value: Decimal,
    /// Source of NAV data
    pub source: Option<String>,
}

impl Nav {
    /// Creates a new NAV record
    ///
    /// # Arguments
    ///
    /// * `isin` - The security this NAV is for
    /// * `nav_date` - The valuation date
    /// * `value` - The NAV value per unit
    pub fn new(isin: Isin, nav_date: NaiveDate, value: Decimal) -> Self {
        Self {
            isin,
            nav_date,
            value,
            source: None,
        }
    }

    /// Records where the price came from
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Date-ordered NAV series for one security
#[derive(Debug, Clone)]
pub struct NavHistory {
    pub isin: Isin,
    pub navs: Vec<Nav>,
}

impl NavHistory {
    /// Creates an empty history
    pub fn new(isin: Isin) -> Self {
        Self {
            isin,
            navs: Vec::new(),
        }
    }

    /// Adds a NAV record, keeping the series sorted by date
    pub fn add(&mut self, nav: Nav) {
        let at = self.navs.partition_point(|n| n.nav_date <= nav.nav_date);
        self.navs.insert(at, nav);
    }

    /// Gets the most recent NAV
    pub fn latest(&self) -> Option<&Nav> {
        self.navs.last()
    }

    /// Gets the NAV for a specific date
    pub fn at_date(&self, date: NaiveDate) -> Option<&Nav> {
        self.navs.iter().rev().find(|n| n.nav_date == date)
    }

    /// Gets the most recent NAV on or before `date`
    pub fn as_of(&self, date: NaiveDate) -> Option<&Nav> {
        self.navs.iter().rev().find(|n| n.nav_date <= date)
    }

    pub fn len(&self) -> usize {
        self.navs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.navs.is_empty()
    }
}

/// Current price per security
///
/// A security absent from the book is valued at zero by the valuation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceBook {
    prices: HashMap<Isin, Decimal>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the price for a security, replacing any earlier one
    pub fn insert(&mut self, isin: Isin, price: Decimal) -> Option<Decimal> {
        self.prices.insert(isin, price)
    }

    /// Records a NAV point's value
    pub fn insert_nav(&mut self, nav: &Nav) {
        self.prices.insert(nav.isin.clone(), nav.value);
    }

    pub fn get(&self, isin: &Isin) -> Option<Decimal> {
        self.prices.get(isin).copied()
    }

    pub fn contains(&self, isin: &Isin) -> bool {
        self.prices.contains_key(isin)
    }

    /// Adds every price from `other` that this book lacks
    pub fn fill_from(&mut self, other: PriceBook) {
        for (isin, price) in other.prices {
            self.prices.entry(isin).or_insert(price);
        }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Isin, &Decimal)> {
        self.prices.iter()
    }
}

impl FromIterator<(Isin, Decimal)> for PriceBook {
    fn from_iter<I: IntoIterator<Item = (Isin, Decimal)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}

impl Extend<(Isin, Decimal)> for PriceBook {
    fn extend<I: IntoIterator<Item = (Isin, Decimal)>>(&mut self, iter: I) {
        self.prices.extend(iter);
    }
}
