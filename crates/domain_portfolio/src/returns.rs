//! Money-weighted return (XIRR)
//!
//! XIRR finds the annual rate `r` at which the discounted cash flows net to
//! zero:
//!
//! ```text
//! Σ CF_i / (1 + r)^t_i = 0,   t_i = (d_i - d_0) / 365
//! ```
//!
//! Newton-Raphson is tried first from a 10% guess. If it stalls or leaves
//! the domain `r > -1`, the root is bracketed and found by bisection.
//!
//! ## Terminal flow
//!
//! The series is closed with one synthetic flow dated `as_of`. By default
//! that flow is the portfolio's market value. `TerminalFlow::LegacySum`
//! instead uses the sum of all prior flows, reproducing the figure older
//! reports printed.

use chrono::NaiveDate;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::temporal::years_between;

use crate::transaction::{Transaction, TransactionKind};

const INITIAL_GUESS: f64 = 0.1;
const MAX_NEWTON_ITERATIONS: u32 = 100;
const MAX_BISECTION_ITERATIONS: u32 = 200;
const TOLERANCE: f64 = 1e-10;
const LOWER_BOUND: f64 = -0.999_999;
const UPPER_LIMIT: f64 = 1e6;

/// Errors from the return calculation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReturnError {
    #[error("No cash flows to compute a return from")]
    EmptySeries,

    #[error("Cash flows never change sign; no rate of return exists")]
    NoSignChange,

    #[error("Every cash flow falls on one date; the rate is undefined")]
    SingleDate,

    #[error("No rate between -99.9999% and {}% brackets the root", UPPER_LIMIT * 100.0)]
    NoBracket,

    #[error("Rate of return did not converge after {iterations} iterations")]
    NoConvergence { iterations: u32 },
}

/// A dated cash flow from the investor's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlow {
    pub date: NaiveDate,
    /// Negative for money paid in, positive for money received
    pub amount: Decimal,
}

impl CashFlow {
    pub fn new(date: NaiveDate, amount: Decimal) -> Self {
        Self { date, amount }
    }
}

/// How transaction amounts become signed cash flows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowConvention {
    /// Use each transaction's amount exactly as recorded
    #[default]
    AsRecorded,
    /// Sign the absolute amount from the unit direction: buys pay in, sells pay out
    FromUnits,
}

/// Which synthetic flow closes the series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalFlow {
    /// Current market value of the portfolio
    #[default]
    MarketValue,
    /// Sum of all prior flows
    LegacySum,
}

/// Converts transactions into cash flows
pub fn cash_flows(transactions: &[Transaction], convention: CashFlowConvention) -> Vec<CashFlow> {
    transactions
        .iter()
        .map(|tx| {
            let amount = match convention {
                CashFlowConvention::AsRecorded => tx.amount,
                CashFlowConvention::FromUnits => match tx.kind() {
                    TransactionKind::Buy => -tx.amount.abs(),
                    TransactionKind::Sell => tx.amount.abs(),
                    TransactionKind::NoOp => tx.amount,
                },
            };
            CashFlow::new(tx.trade_date, amount)
        })
        .collect()
}

/// Appends the terminal flow dated `as_of`
pub fn close_series(
    mut flows: Vec<CashFlow>,
    terminal: TerminalFlow,
    market_value: Decimal,
    as_of: NaiveDate,
) -> Vec<CashFlow> {
    let amount = match terminal {
        TerminalFlow::MarketValue => market_value,
        TerminalFlow::LegacySum => flows.iter().map(|f| f.amount).sum(),
    };
    flows.push(CashFlow::new(as_of, amount));
    flows
}

/// Computes XIRR as a fraction (0.1 = 10%)
pub fn xirr(flows: &[CashFlow]) -> Result<f64, ReturnError> {
    let Some(origin) = flows.iter().map(|f| f.date).min() else {
        return Err(ReturnError::EmptySeries);
    };

    let series: Vec<(f64, f64)> = flows
        .iter()
        .filter_map(|f| {
            f.amount
                .to_f64()
                .map(|amount| (amount, years_between(origin, f.date)))
        })
        .filter(|(amount, _)| *amount != 0.0)
        .collect();

    let has_inflow = series.iter().any(|(a, _)| *a > 0.0);
    let has_outflow = series.iter().any(|(a, _)| *a < 0.0);
    if !(has_inflow && has_outflow) {
        return Err(ReturnError::NoSignChange);
    }
    if series.iter().all(|(_, years)| *years == 0.0) {
        return Err(ReturnError::SingleDate);
    }

    match newton(&series) {
        Ok(rate) => Ok(rate),
        Err(spent) => bisect(&series, spent),
    }
}

/// Computes XIRR as a percentage rounded to four places
pub fn xirr_percent(flows: &[CashFlow]) -> Result<Decimal, ReturnError> {
    let rate = xirr(flows)?;
    Decimal::from_f64(rate * 100.0)
        .map(|pct| pct.round_dp(4))
        .ok_or(ReturnError::NoBracket)
}

fn npv(series: &[(f64, f64)], rate: f64) -> f64 {
    series
        .iter()
        .map(|(amount, years)| amount / (1.0 + rate).powf(*years))
        .sum()
}

fn npv_and_derivative(series: &[(f64, f64)], rate: f64) -> (f64, f64) {
    series.iter().fold((0.0, 0.0), |(value, slope), (amount, years)| {
        let discount = (1.0 + rate).powf(*years);
        (
            value + amount / discount,
            slope - years * amount / (discount * (1.0 + rate)),
        )
    })
}

/// Newton-Raphson from `INITIAL_GUESS`; on failure returns the iterations spent
fn newton(series: &[(f64, f64)]) -> Result<f64, u32> {
    let mut rate = INITIAL_GUESS;

    for iteration in 1..=MAX_NEWTON_ITERATIONS {
        let (value, slope) = npv_and_derivative(series, rate);
        if !value.is_finite() || !slope.is_finite() || slope.abs() < f64::EPSILON {
            return Err(iteration);
        }

        let next = rate - value / slope;
        if !next.is_finite() || next <= -1.0 {
            return Err(iteration);
        }
        if (next - rate).abs() < TOLERANCE {
            return Ok(next);
        }
        rate = next;
    }

    Err(MAX_NEWTON_ITERATIONS)
}

fn bisect(series: &[(f64, f64)], spent: u32) -> Result<f64, ReturnError> {
    let mut low = LOWER_BOUND;
    let mut high = 1.0;
    let low_value = npv(series, low);

    while npv(series, high).signum() == low_value.signum() {
        high *= 2.0;
        if high > UPPER_LIMIT {
            return Err(ReturnError::NoBracket);
        }
    }

    for _ in 0..MAX_BISECTION_ITERATIONS {
        let mid = (low + high) / 2.0;
        let value = npv(series, mid);
        if value.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Ok(mid);
        }
        if value.signum() == npv(series, low).signum() {
            low = mid;
        } else {
            high = mid;
        }
    }

    Err(ReturnError::NoConvergence {
        iterations: spent + MAX_BISECTION_ITERATIONS,
    })
}
