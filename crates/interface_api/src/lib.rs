//! HTTP API and Reporting Layer
//!
//! This crate exposes portfolio valuation over HTTP using Axum and as a
//! plain-text report for the command line.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for health and valuation
//! - **Middleware**: Tracing and audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Report**: Plain-text rendering of a valuation
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(service, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod report;
pub mod sources;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;
use domain_portfolio::PortfolioService;

use crate::config::AppConfig;
use crate::handlers::{health, portfolio};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PortfolioService>,
    pub config: AppConfig,
    /// Probe for the NAV provider, when it supports one
    pub price_health: Option<Arc<dyn HealthCheckable>>,
}

impl AppState {
    pub fn new(service: PortfolioService, config: AppConfig) -> Self {
        Self {
            service: Arc::new(service),
            config,
            price_health: None,
        }
    }

    pub fn with_price_health(mut self, probe: Arc<dyn HealthCheckable>) -> Self {
        self.price_health = Some(probe);
        self
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Valuation service and configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Portfolio routes
    let portfolio_routes = Router::new().route("/summary", post(portfolio::summarize));

    let api_routes = Router::new()
        .nest("/portfolio", portfolio_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
