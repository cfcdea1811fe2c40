//! Portfolio Valuation - Report Binary
//!
//! Values a statement file and prints totals, per-security figures and XIRR.
//!
//! ```bash
//! folio-report statement.json --navs navs.json --as-of 2024-12-31
//! ```
//!
//! Without `--navs`, prices come from the HTTP provider configured through
//! `FOLIO_PRICE_SOURCE__*` variables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use domain_portfolio::{
    Grouping, OversellPolicy, PortfolioService, TerminalFlow, TransactionSource,
};
use infra_data::JsonTransactionSource;
use interface_api::{config::AppConfig, dto::portfolio::SummaryResponse, report, sources};

#[derive(Parser)]
#[command(name = "folio-report")]
#[command(about = "Value a mutual-fund statement with FIFO lots and XIRR", long_about = None)]
struct Cli {
    /// Statement JSON file
    statement: PathBuf,

    /// JSON object of ISIN to NAV; replaces the HTTP provider
    #[arg(long)]
    navs: Option<PathBuf>,

    /// Valuation date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Report one line per security or per folio and security
    #[arg(long, value_enum)]
    group_by: Option<GroupBy>,

    /// Skip sells larger than the units held instead of truncating them
    #[arg(long, default_value_t = false)]
    reject_oversell: bool,

    /// Close the XIRR series with the sum of prior flows instead of market value
    #[arg(long, default_value_t = false)]
    legacy_terminal_flow: bool,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupBy {
    Security,
    Holding,
}

impl From<GroupBy> for Grouping {
    fn from(value: GroupBy) -> Self {
        match value {
            GroupBy::Security => Grouping::BySecurity,
            GroupBy::Holding => Grouping::ByHolding,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("loading configuration")?;
    init_tracing(&config.log_level);

    let as_of = cli.as_of.unwrap_or_else(|| Utc::now().date_naive());

    if let Some(navs) = &cli.navs {
        config.nav_file = Some(navs.display().to_string());
    }
    if let Some(group_by) = cli.group_by {
        config.valuation.grouping = group_by.into();
    }
    if cli.reject_oversell {
        config.valuation.oversell = OversellPolicy::Reject;
    }
    if cli.legacy_terminal_flow {
        config.valuation.terminal_flow = TerminalFlow::LegacySum;
    }

    let transactions = JsonTransactionSource::from_path(&cli.statement)
        .load()
        .with_context(|| format!("reading {}", cli.statement.display()))?;

    let wiring = sources::price_source(&config, as_of).context("building price source")?;
    let service = PortfolioService::new(wiring.source, config.valuation);
    let report = service.evaluate(&transactions, as_of).await;

    if cli.json {
        let body = serde_json::to_string_pretty(&SummaryResponse::from(&report))?;
        println!("{body}");
    } else {
        print!("{}", report::render(&report));
    }

    Ok(())
}

/// Logs go to stderr so the report can be piped
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
