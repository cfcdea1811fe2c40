//! Ports for the portfolio domain
//!
//! Adapters in `infra_data` implement these traits; tests supply in-memory
//! versions.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use core_kernel::{DomainPort, Isin, PortError};

use crate::error::PortfolioError;
use crate::nav::{Nav, PriceBook};
use crate::transaction::Transaction;

/// Supplies the transaction history to value
pub trait TransactionSource: DomainPort {
    /// Loads every transaction, in source order
    fn load(&self) -> Result<Vec<Transaction>, PortfolioError>;
}

/// Supplies the current NAV of a security
#[async_trait]
pub trait PriceSource: DomainPort {
    /// Short name used in logs and NAV records
    fn name(&self) -> &str;

    /// Returns the most recent NAV available for `isin`
    async fn latest_nav(&self, isin: &Isin) -> Result<Nav, PortError>;
}

/// A price lookup that failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFailure {
    pub isin: Isin,
    pub message: String,
}

/// Outcome of a batch of price lookups
#[derive(Debug, Clone, Default)]
pub struct NavFetch {
    pub prices: PriceBook,
    pub failures: Vec<PriceFailure>,
}

/// Fetches the latest NAV of every ISIN, running up to `concurrency` lookups at once
///
/// Failures are logged and collected; the securities involved are simply
/// absent from the returned price book.
pub async fn fetch_latest_navs<I>(source: &dyn PriceSource, isins: I, concurrency: usize) -> NavFetch
where
    I: IntoIterator<Item = Isin>,
{
    let results: Vec<(Isin, Result<Nav, PortError>)> = stream::iter(isins)
        .map(|isin| async move {
            let result = source.latest_nav(&isin).await;
            (isin, result)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut fetch = NavFetch::default();
    for (isin, result) in results {
        match result {
            Ok(nav) => {
                debug!(source = source.name(), %isin, nav = %nav.value, date = %nav.nav_date, "Fetched NAV");
                fetch.prices.insert_nav(&nav);
            }
            Err(e) => {
                warn!(source = source.name(), %isin, error = %e, "NAV lookup failed; valuing at zero");
                fetch.failures.push(PriceFailure {
                    isin,
                    message: e.to_string(),
                });
            }
        }
    }

    fetch.failures.sort_by(|a, b| a.isin.cmp(&b.isin));
    fetch
}
