//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating transaction histories.

use std::collections::HashMap;

use core_kernel::Isin;
use domain_portfolio::Transaction;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::fixtures::{DateFixtures, FolioFixtures, IsinFixtures};

/// Strategy for fund ISINs from the fixtures
pub fn isin_strategy() -> impl Strategy<Value = Isin> {
    prop_oneof![
        Just(IsinFixtures::absl()),
        Just(IsinFixtures::hdfc()),
        Just(IsinFixtures::icici()),
        Just(IsinFixtures::ppfas()),
    ]
}

/// Strategy for unit counts with three decimal places (0.001 to 10,000)
pub fn units_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 3))
}

/// Strategy for NAV values (1.00 to 1,000.00)
pub fn nav_strategy() -> impl Strategy<Value = Decimal> {
    (100i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for arbitrary histories in one folio
///
/// Sells may exceed holdings, hit securities never bought, or carry zero
/// units.
pub fn history_strategy(max_len: usize) -> impl Strategy<Value = Vec<Transaction>> {
    proptest::collection::vec(
        (isin_strategy(), -2i8..=2i8, units_strategy(), nav_strategy()),
        0..max_len,
    )
    .prop_map(|steps| {
        steps
            .into_iter()
            .enumerate()
            .map(|(day, (isin, direction, units, price))| {
                let date = DateFixtures::day(day as u64);
                match direction {
                    0 => Transaction::new(FolioFixtures::primary(), isin, Decimal::ZERO, price, date, Decimal::ZERO),
                    d if d > 0 => Transaction::buy(FolioFixtures::primary(), isin, units, price, date),
                    _ => Transaction::sell(FolioFixtures::primary(), isin, units, price, date),
                }
            })
            .collect()
    })
}

/// Strategy for histories whose sells never exceed the units held
pub fn covered_history_strategy(max_len: usize) -> impl Strategy<Value = Vec<Transaction>> {
    proptest::collection::vec(
        (isin_strategy(), any::<bool>(), units_strategy(), nav_strategy()),
        0..max_len,
    )
    .prop_map(|steps| {
        let mut held: HashMap<Isin, Decimal> = HashMap::new();
        let mut txs = Vec::with_capacity(steps.len());

        for (day, (isin, is_buy, units, price)) in steps.into_iter().enumerate() {
            let date = DateFixtures::day(day as u64);
            let position = held.entry(isin.clone()).or_default();

            if is_buy || position.is_zero() {
                *position += units;
                txs.push(Transaction::buy(FolioFixtures::primary(), isin, units, price, date));
            } else {
                let units = units.min(*position);
                *position -= units;
                txs.push(Transaction::sell(FolioFixtures::primary(), isin, units, price, date));
            }
        }

        txs
    })
}
