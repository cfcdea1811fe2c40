//! In-memory Price Sources
//!
//! Stand-ins for NAV providers so service and API tests run without network
//! access.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use core_kernel::{DomainPort, Isin, PortError};
use domain_portfolio::{Nav, PriceSource};
use rust_decimal::Decimal;

use crate::fixtures::DateFixtures;

/// Serves fixed prices and counts lookups
///
/// Unknown securities fail with `PortError::NotFound`.
#[derive(Debug, Default)]
pub struct FixedPriceSource {
    prices: HashMap<Isin, Decimal>,
    lookups: AtomicUsize,
}

impl FixedPriceSource {
    pub fn new(prices: impl IntoIterator<Item = (Isin, Decimal)>) -> Self {
        Self {
            prices: prices.into_iter().collect(),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Number of `latest_nav` calls served so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl DomainPort for FixedPriceSource {}

#[async_trait]
impl PriceSource for FixedPriceSource {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn latest_nav(&self, isin: &Isin) -> Result<Nav, PortError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.prices
            .get(isin)
            .map(|value| Nav::new(isin.clone(), DateFixtures::year_end(), *value))
            .ok_or_else(|| PortError::not_found("Nav", isin))
    }
}

/// Fails every lookup as if the provider were down
#[derive(Debug, Default)]
pub struct UnavailablePriceSource;

impl DomainPort for UnavailablePriceSource {}

#[async_trait]
impl PriceSource for UnavailablePriceSource {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn latest_nav(&self, _isin: &Isin) -> Result<Nav, PortError> {
        Err(PortError::ServiceUnavailable {
            service: "test provider".to_string(),
        })
    }
}
