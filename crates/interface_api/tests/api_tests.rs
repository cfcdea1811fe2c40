//! HTTP API tests

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use rust_decimal_macros::dec;
use serde_json::json;

use core_kernel::{AdapterHealth, HealthCheckResult, HealthCheckable};
use domain_portfolio::{OversellPolicy, PortfolioService, ValuationSettings};
use interface_api::config::AppConfig;
use interface_api::dto::portfolio::SummaryResponse;
use interface_api::handlers::health::HealthResponse;
use interface_api::{create_router, AppState};
use test_utils::{FixedPriceSource, IsinFixtures, UnavailablePriceSource};

fn server_with(settings: ValuationSettings) -> TestServer {
    let prices = FixedPriceSource::new([(IsinFixtures::absl(), dec!(130))]);
    let service = PortfolioService::new(Arc::new(prices), settings);
    TestServer::new(create_router(AppState::new(service, AppConfig::default()))).unwrap()
}

fn scenario_body() -> serde_json::Value {
    json!({
        "transactions": [
            {"folio": "1001", "isin": "INF209K01YN0", "units": "10", "price": "100",
             "trade_date": "01-Jan-2024", "amount": "-1000"},
            {"folio": "1001", "isin": "INF209K01YN0", "units": 5, "price": 120,
             "trade_date": "2024-01-30", "amount": -600},
            {"folio": "1001", "isin": "INF209K01YN0", "units": "-12", "price": "125",
             "trade_date": "29-Feb-2024", "amount": "1500"}
        ],
        "as_of": "2024-12-31"
    })
}

// ============================================================================
// Health Tests
// ============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let server = server_with(ValuationSettings::default());
        let response = server.get("/health").await;

        response.assert_status_ok();
        assert_eq!(response.json::<HealthResponse>().status, "healthy");
    }

    struct DownProvider;

    #[async_trait::async_trait]
    impl HealthCheckable for DownProvider {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "down".to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms: 1,
                message: Some("connection refused".to_string()),
                checked_at: chrono::Utc::now(),
            }
        }
    }

    #[tokio::test]
    async fn test_unhealthy_provider_is_not_ready() {
        let prices = FixedPriceSource::new([(IsinFixtures::absl(), dec!(130))]);
        let service = PortfolioService::new(Arc::new(prices), ValuationSettings::default());
        let state = AppState::new(service, AppConfig::default()).with_price_health(Arc::new(DownProvider));
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server.get("/health/ready").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["error"], "unavailable");
        assert_eq!(body["message"], "connection refused");
    }

    #[tokio::test]
    async fn test_ready_without_probe() {
        let server = server_with(ValuationSettings::default());
        let response = server.get("/health/ready").await;

        response.assert_status_ok();
        let body = response.json::<HealthResponse>();
        assert_eq!(body.status, "ready");
        assert!(body.price_source.is_none());
    }
}

// ============================================================================
// Summary Tests
// ============================================================================

mod summary_tests {
    use super::*;

    #[tokio::test]
    async fn test_scenario_summary() {
        let server = server_with(ValuationSettings::default());
        let response = server.post("/api/v1/portfolio/summary").json(&scenario_body()).await;

        response.assert_status_ok();
        let body = response.json::<SummaryResponse>();
        assert_eq!(body.total_acquisition_cost, dec!(360));
        assert_eq!(body.total_market_value, dec!(390));
        assert_eq!(body.total_unrealized_gain, dec!(30));
        assert_eq!(body.holdings.len(), 1);
        assert_eq!(body.holdings[0].remaining_units, dec!(3));
        assert!(body.xirr_percent.is_some());
        assert!(body.missing_prices.is_empty());
    }

    #[tokio::test]
    async fn test_request_navs_override_provider() {
        let prices = Arc::new(FixedPriceSource::new([(IsinFixtures::absl(), dec!(130))]));
        let service = PortfolioService::new(prices.clone(), ValuationSettings::default());
        let server = TestServer::new(create_router(AppState::new(service, AppConfig::default()))).unwrap();
        let mut body = scenario_body();
        body["navs"] = json!({"INF209K01YN0": "200"});

        let response = server.post("/api/v1/portfolio/summary").json(&body).await;

        response.assert_status_ok();
        assert_eq!(response.json::<SummaryResponse>().total_market_value, dec!(600));
        assert_eq!(prices.lookups(), 0);
    }

    #[tokio::test]
    async fn test_unpriced_security_is_listed() {
        let server = server_with(ValuationSettings::default());
        let body = json!({
            "transactions": [
                {"folio": "1001", "isin": "INF179K01BE2", "units": "4", "price": "50",
                 "trade_date": "01-Jan-2024", "amount": "-200"}
            ],
            "as_of": "2024-12-31"
        });

        let response = server.post("/api/v1/portfolio/summary").json(&body).await;

        response.assert_status_ok();
        let summary = response.json::<SummaryResponse>();
        assert_eq!(summary.total_market_value, dec!(0));
        assert_eq!(summary.total_unrealized_gain, dec!(-200));
        assert_eq!(summary.missing_prices, vec!["INF179K01BE2".to_string()]);
        assert_eq!(summary.price_failures.len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_oversell_is_reported() {
        let server = server_with(ValuationSettings::default().with_oversell(OversellPolicy::Reject));
        let body = json!({
            "transactions": [
                {"folio": "1001", "isin": "INF209K01YN0", "units": "10", "price": "100",
                 "trade_date": "01-Jan-2024", "amount": "-1000"},
                {"folio": "1001", "isin": "INF209K01YN0", "units": "-15", "price": "110",
                 "trade_date": "02-Jan-2024", "amount": "1650"}
            ],
            "as_of": "2024-12-31"
        });

        let response = server.post("/api/v1/portfolio/summary").json(&body).await;

        response.assert_status_ok();
        let summary = response.json::<SummaryResponse>();
        assert_eq!(summary.ledger_errors.len(), 1);
        assert_eq!(summary.total_market_value, dec!(1300));
    }

    #[tokio::test]
    async fn test_empty_portfolio() {
        let server = server_with(ValuationSettings::default());
        let response = server
            .post("/api/v1/portfolio/summary")
            .json(&json!({"transactions": [], "as_of": "2024-12-31"}))
            .await;

        response.assert_status_ok();
        let summary = response.json::<SummaryResponse>();
        assert!(summary.holdings.is_empty());
        assert!(summary.xirr_percent.is_none());
        assert!(summary.xirr_error.is_some());
    }

    #[tokio::test]
    async fn test_bad_date_is_bad_request() {
        let server = server_with(ValuationSettings::default());
        let mut body = scenario_body();
        body["transactions"][0]["trade_date"] = json!("31/01/2024");

        let response = server.post("/api/v1/portfolio/summary").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_isin_fails_validation() {
        let server = server_with(ValuationSettings::default());
        let mut body = scenario_body();
        body["transactions"][1]["isin"] = json!("");

        let response = server.post("/api/v1/portfolio/summary").json(&body).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_provider_outage_still_values() {
        let service = PortfolioService::new(Arc::new(UnavailablePriceSource), ValuationSettings::default());
        let server = TestServer::new(create_router(AppState::new(service, AppConfig::default()))).unwrap();

        let response = server.post("/api/v1/portfolio/summary").json(&scenario_body()).await;

        response.assert_status_ok();
        let summary = response.json::<SummaryResponse>();
        assert_eq!(summary.total_acquisition_cost, dec!(360));
        assert_eq!(summary.total_market_value, dec!(0));
        assert_eq!(summary.price_failures.len(), 1);
    }
}
