//! Portfolio DTOs

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{parse_trade_date, Folio, Isin};
use domain_portfolio::{
    round_currency, round_units, HoldingSummary, PortfolioReport, PriceBook, Transaction,
};

use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TransactionRequest {
    #[validate(length(min = 1, max = 64))]
    pub folio: String,
    #[validate(length(min = 1, max = 32))]
    pub isin: String,
    /// Signed units; negative for redemptions
    pub units: Decimal,
    pub price: Decimal,
    /// `15-Jan-2024` or `2024-01-15`
    #[validate(length(min = 1))]
    pub trade_date: String,
    pub amount: Decimal,
}

impl TransactionRequest {
    pub fn to_transaction(&self) -> Result<Transaction, ApiError> {
        Ok(Transaction::new(
            Folio::new(&self.folio)?,
            Isin::new(&self.isin)?,
            self.units,
            self.price,
            parse_trade_date(&self.trade_date)?,
            self.amount,
        ))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SummaryRequest {
    #[validate(length(max = 50000), nested)]
    pub transactions: Vec<TransactionRequest>,
    /// Known NAVs keyed by ISIN; other securities are priced by the NAV provider
    #[serde(default)]
    pub navs: HashMap<String, Decimal>,
    /// Valuation date; defaults to today
    pub as_of: Option<NaiveDate>,
}

impl SummaryRequest {
    pub fn price_book(&self) -> Result<PriceBook, ApiError> {
        self.navs
            .iter()
            .map(|(isin, nav)| {
                if nav.is_sign_negative() {
                    return Err(ApiError::BadRequest(format!("Negative NAV {nav} for {isin}")));
                }
                Ok((Isin::new(isin)?, *nav))
            })
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HoldingResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folio: Option<String>,
    pub isin: String,
    pub remaining_units: Decimal,
    pub acquisition_cost: Decimal,
    pub current_price: Option<Decimal>,
    pub market_value: Decimal,
    pub unrealized_gain: Decimal,
    pub open_lots: usize,
}

impl From<&HoldingSummary> for HoldingResponse {
    fn from(h: &HoldingSummary) -> Self {
        Self {
            folio: h.folio.as_ref().map(|f| f.to_string()),
            isin: h.isin.to_string(),
            remaining_units: round_units(h.remaining_units),
            acquisition_cost: round_currency(h.acquisition_cost),
            current_price: h.current_price,
            market_value: round_currency(h.market_value),
            unrealized_gain: round_currency(h.unrealized_gain),
            open_lots: h.open_lots,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PriceFailureResponse {
    pub isin: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub as_of: NaiveDate,
    pub total_market_value: Decimal,
    pub total_acquisition_cost: Decimal,
    pub total_unrealized_gain: Decimal,
    /// XIRR in percent; absent when no rate exists
    pub xirr_percent: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xirr_error: Option<String>,
    pub holdings: Vec<HoldingResponse>,
    pub missing_prices: Vec<String>,
    pub ledger_errors: Vec<String>,
    pub price_failures: Vec<PriceFailureResponse>,
}

impl From<&PortfolioReport> for SummaryResponse {
    fn from(report: &PortfolioReport) -> Self {
        let summary = &report.summary;
        let (xirr_percent, xirr_error) = match &report.xirr {
            Ok(pct) => (Some(*pct), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            as_of: report.as_of,
            total_market_value: round_currency(summary.total_market_value),
            total_acquisition_cost: round_currency(summary.total_acquisition_cost),
            total_unrealized_gain: round_currency(summary.total_unrealized_gain),
            xirr_percent,
            xirr_error,
            holdings: summary.holdings.iter().map(HoldingResponse::from).collect(),
            missing_prices: summary.missing_prices.iter().map(ToString::to_string).collect(),
            ledger_errors: report.ledger_errors.iter().map(ToString::to_string).collect(),
            price_failures: report
                .price_failures
                .iter()
                .map(|f| PriceFailureResponse {
                    isin: f.isin.to_string(),
                    message: f.message.clone(),
                })
                .collect(),
        }
    }
}
