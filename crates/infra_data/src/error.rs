//! Data source error types
//!
//! Adapters report failures as [`SourceError`] internally and convert to the
//! domain's error types at the port boundary.

use std::path::PathBuf;

use thiserror::Error;

use core_kernel::PortError;
use domain_portfolio::PortfolioError;

/// Errors that can occur while reading statements or prices
#[derive(Debug, Error)]
pub enum SourceError {
    /// A file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or has the wrong overall shape
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// One transaction record is missing a field or holds a bad value
    #[error("Record {index}: {message}")]
    Record { index: usize, message: String },

    /// A price entry could not be used
    #[error("Bad price for {isin}: {message}")]
    Price { isin: String, message: String },

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Adapter configuration is unusable
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl SourceError {
    /// Creates a record error
    pub fn record(index: usize, message: impl Into<String>) -> Self {
        SourceError::Record {
            index,
            message: message.into(),
        }
    }

    /// Creates an I/O error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SourceError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<SourceError> for PortError {
    fn from(error: SourceError) -> Self {
        match error {
            SourceError::Io { .. } => PortError::connection(error.to_string()),
            SourceError::Json(_) | SourceError::Record { .. } | SourceError::Price { .. } => {
                PortError::transformation(error.to_string())
            }
            SourceError::Client(_) | SourceError::Configuration(_) => PortError::internal(error.to_string()),
        }
    }
}

impl From<SourceError> for PortfolioError {
    fn from(error: SourceError) -> Self {
        match error {
            SourceError::Record { index, message } => PortfolioError::data_format(index, message),
            SourceError::Json(e) => PortfolioError::data_format(0, e.to_string()),
            other => PortfolioError::Source(other.into()),
        }
    }
}
