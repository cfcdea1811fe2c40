//! Price source selection

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use core_kernel::HealthCheckable;
use domain_portfolio::PriceSource;
use infra_data::{HttpNavSource, SourceError, StaticNavSource};

use crate::config::AppConfig;

/// A configured price source and, when it has one, its health probe
pub struct PriceWiring {
    pub source: Arc<dyn PriceSource>,
    pub health: Option<Arc<dyn HealthCheckable>>,
}

/// Builds the price source named by the configuration
///
/// A configured NAV file wins over the HTTP provider. File prices are stamped
/// with `nav_date`.
pub fn price_source(config: &AppConfig, nav_date: NaiveDate) -> Result<PriceWiring, SourceError> {
    match &config.nav_file {
        Some(path) => {
            let source = StaticNavSource::from_path(path, nav_date)?;
            info!(path = %path, prices = source.len(), "Using static NAV file");
            Ok(PriceWiring {
                source: Arc::new(source),
                health: None,
            })
        }
        None => {
            let source = Arc::new(HttpNavSource::new(config.price_source.clone())?);
            info!(url_template = %config.price_source.url_template, "Using HTTP NAV provider");
            Ok(PriceWiring {
                source: source.clone(),
                health: Some(source),
            })
        }
    }
}
