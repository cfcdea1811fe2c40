//! Portfolio domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{HoldingKey, PortError};

/// Errors that can occur in the portfolio domain
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// A transaction record is missing a field or carries an unparseable value
    #[error("Data format error in record {index}: {message}")]
    DataFormat { index: usize, message: String },

    /// A sell asked for more units than the holding has open
    #[error("Oversell on {key}: {requested} units requested, {available} held")]
    Oversell {
        key: HoldingKey,
        requested: Decimal,
        available: Decimal,
    },

    /// The transaction source could not be read
    #[error("Transaction source error: {0}")]
    Source(#[from] PortError),
}

impl PortfolioError {
    pub fn data_format(index: usize, message: impl Into<String>) -> Self {
        PortfolioError::DataFormat {
            index,
            message: message.into(),
        }
    }
}
