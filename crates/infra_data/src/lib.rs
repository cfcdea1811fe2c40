//! Data Infrastructure Layer
//!
//! Adapters that feed the portfolio domain: statement files on the
//! transaction side, fixed maps and HTTP providers on the price side.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_data::{HttpNavConfig, HttpNavSource, JsonTransactionSource};
//! use domain_portfolio::TransactionSource;
//!
//! let transactions = JsonTransactionSource::from_path("statement.json").load()?;
//! let prices = HttpNavSource::new(HttpNavConfig::default())?;
//! ```

pub mod error;
pub mod json_source;
pub mod static_nav;
pub mod http_nav;
mod values;

pub use error::SourceError;
pub use json_source::{parse_statement, JsonTransactionSource};
pub use static_nav::StaticNavSource;
pub use http_nav::{HttpNavConfig, HttpNavSource};
