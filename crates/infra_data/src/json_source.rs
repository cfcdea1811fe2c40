//! JSON statement adapter
//!
//! Reads consolidated account statements of the form
//!
//! ```json
//! {"data": [{"dtSummary": [
//!     {"folio": "1001", "isin": "INF209K01YN0", "trxnUnits": "64.7249",
//!      "purchasePrice": "15.45", "trxnDate": "15-Jan-2024", "trxnAmount": "-1000.00"}
//! ]}]}
//! ```
//!
//! Records from every `data` block are flattened in document order. The first
//! record with a missing or unparseable field fails the whole load with its
//! zero-based position.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use core_kernel::{parse_trade_date, DomainPort, Folio, Isin};
use domain_portfolio::{PortfolioError, Transaction, TransactionSource};

use crate::error::SourceError;
use crate::values;

#[derive(Debug, Deserialize)]
struct Statement {
    data: Vec<StatementBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatementBlock {
    #[serde(default)]
    dt_summary: Vec<RawTransaction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    folio: Option<Value>,
    isin: Option<Value>,
    trxn_units: Option<Value>,
    purchase_price: Option<Value>,
    trxn_date: Option<Value>,
    trxn_amount: Option<Value>,
}

impl RawTransaction {
    fn into_transaction(self, index: usize) -> Result<Transaction, SourceError> {
        let field = |value: Option<Value>, name: &str| -> Result<Value, SourceError> {
            match value {
                Some(Value::Null) | None => Err(SourceError::record(index, format!("missing {name}"))),
                Some(v) => Ok(v),
            }
        };
        let bad = |name: &str, message: String| SourceError::record(index, format!("{name}: {message}"));

        let folio = values::text(&field(self.folio, "folio")?).map_err(|m| bad("folio", m))?;
        let folio = Folio::new(folio).map_err(|e| bad("folio", e.to_string()))?;

        let isin = values::text(&field(self.isin, "isin")?).map_err(|m| bad("isin", m))?;
        let isin = Isin::new(isin).map_err(|e| bad("isin", e.to_string()))?;
        if !isin.is_well_formed() {
            warn!(record = index, %isin, "ISIN fails check-digit validation; keeping as given");
        }

        let units = values::decimal(&field(self.trxn_units, "trxnUnits")?).map_err(|m| bad("trxnUnits", m))?;
        let price =
            values::decimal(&field(self.purchase_price, "purchasePrice")?).map_err(|m| bad("purchasePrice", m))?;
        let amount = values::decimal(&field(self.trxn_amount, "trxnAmount")?).map_err(|m| bad("trxnAmount", m))?;

        let date = values::text(&field(self.trxn_date, "trxnDate")?).map_err(|m| bad("trxnDate", m))?;
        let trade_date = parse_trade_date(&date).map_err(|e| bad("trxnDate", e.to_string()))?;

        Ok(Transaction::new(folio, isin, units, price, trade_date, amount))
    }
}

/// Parses a statement document into transactions
pub fn parse_statement(json: &str) -> Result<Vec<Transaction>, SourceError> {
    let statement: Statement = serde_json::from_str(json)?;

    statement
        .data
        .into_iter()
        .flat_map(|block| block.dt_summary)
        .enumerate()
        .map(|(index, raw)| raw.into_transaction(index))
        .collect()
}

/// Where the statement text comes from
#[derive(Debug, Clone)]
enum Origin {
    File(PathBuf),
    Inline(String),
}

/// Transaction source backed by a JSON statement
#[derive(Debug, Clone)]
pub struct JsonTransactionSource {
    origin: Origin,
}

impl JsonTransactionSource {
    /// Reads the statement from a file on every load
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            origin: Origin::File(path.as_ref().to_path_buf()),
        }
    }

    /// Uses an in-memory statement document
    pub fn from_json(json: impl Into<String>) -> Self {
        Self {
            origin: Origin::Inline(json.into()),
        }
    }

    fn read(&self) -> Result<Vec<Transaction>, SourceError> {
        match &self.origin {
            Origin::File(path) => {
                debug!(path = %path.display(), "Reading statement");
                let text = std::fs::read_to_string(path).map_err(|e| SourceError::io(path, e))?;
                parse_statement(&text)
            }
            Origin::Inline(json) => parse_statement(json),
        }
    }
}

impl DomainPort for JsonTransactionSource {}

impl TransactionSource for JsonTransactionSource {
    fn load(&self) -> Result<Vec<Transaction>, PortfolioError> {
        let transactions = self.read()?;
        info!(count = transactions.len(), "Loaded transactions");
        Ok(transactions)
    }
}
