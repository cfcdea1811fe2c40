//! Portfolio handlers

use axum::{extract::State, Json};
use chrono::Utc;
use tracing::info;
use validator::Validate;

use domain_portfolio::Transaction;

use crate::dto::portfolio::{SummaryRequest, SummaryResponse};
use crate::{error::ApiError, AppState};

/// Values the posted transactions
///
/// NAVs supplied in the request take precedence; the rest are fetched from
/// the configured provider. Missing prices value a holding at zero and are
/// listed in the response rather than failing the request.
pub async fn summarize(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, ApiError> {
    request.validate()?;

    let transactions = request
        .transactions
        .iter()
        .map(|tx| tx.to_transaction())
        .collect::<Result<Vec<Transaction>, _>>()?;
    let known = request.price_book()?;
    let as_of = request.as_of.unwrap_or_else(|| Utc::now().date_naive());

    info!(transactions = transactions.len(), known_prices = known.len(), %as_of, "Valuing portfolio");

    let report = state.service.evaluate_with_prices(&transactions, known, as_of).await;
    Ok(Json(SummaryResponse::from(&report)))
}
