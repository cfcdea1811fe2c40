//! Portfolio Valuation - API Server Binary
//!
//! This binary starts the HTTP API for portfolio valuation.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin folio-api
//!
//! # Run with environment variables
//! FOLIO_PORT=9090 FOLIO_NAV_FILE=navs.json cargo run --bin folio-api
//! ```
//!
//! # Environment Variables
//!
//! * `FOLIO_HOST` - Server host (default: 0.0.0.0)
//! * `FOLIO_PORT` - Server port (default: 8080)
//! * `FOLIO_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `FOLIO_NAV_FILE` - Static NAV file used instead of the HTTP provider
//! * `FOLIO_PRICE_SOURCE__URL_TEMPLATE` - NAV endpoint with a `{code}` placeholder
//! * `FOLIO_VALUATION__OVERSELL` - `truncate` (default) or `reject`

use std::net::SocketAddr;

use anyhow::Context;
use chrono::Utc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_portfolio::PortfolioService;
use interface_api::{config::AppConfig, create_router, sources, AppState};

/// Main entry point for the API server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded
/// - The price source cannot be built
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("loading configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        oversell = ?config.valuation.oversell,
        grouping = ?config.valuation.grouping,
        "Starting portfolio valuation API"
    );

    let wiring = sources::price_source(&config, Utc::now().date_naive()).context("building price source")?;
    let service = PortfolioService::new(wiring.source, config.valuation);

    let mut state = AppState::new(service, config.clone());
    if let Some(probe) = wiring.health {
        state = state.with_price_health(probe);
    }
    let app = create_router(state);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
