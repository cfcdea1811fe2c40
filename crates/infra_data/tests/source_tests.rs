//! Integration tests for infra_data adapters

use std::collections::HashMap;
use std::sync::Arc;

use httpmock::prelude::*;
use rust_decimal_macros::dec;
use serde_json::json;

use core_kernel::{AdapterHealth, HealthCheckable, PortError};
use domain_portfolio::{
    fetch_latest_navs, PortfolioError, PortfolioService, PriceSource, TransactionSource, ValuationSettings,
};
use infra_data::{HttpNavConfig, HttpNavSource, JsonTransactionSource, StaticNavSource};
use test_utils::{DateFixtures, FolioFixtures, IsinFixtures, ScenarioBuilder, StatementFixtures};

fn source_for(server: &MockServer) -> HttpNavSource {
    HttpNavSource::new(HttpNavConfig {
        url_template: server.url("/mf/{code}"),
        timeout_secs: 5,
        max_retries: 2,
        retry_backoff_ms: 1,
        code_overrides: HashMap::new(),
        health_code: None,
    })
    .unwrap()
}

// ============================================================================
// HTTP NAV Source Tests
// ============================================================================

mod http_nav_tests {
    use super::*;

    #[tokio::test]
    async fn test_latest_point_is_returned() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/mf/INF209K01YN0");
                then.status(200).json_body(json!({
                    "meta": {"scheme_name": "Test Fund"},
                    "data": [
                        {"date": "27-06-2024", "nav": "810.1000"},
                        {"date": "28-06-2024", "nav": "812.3051"},
                        {"date": "26-06-2024", "nav": "808.0000"}
                    ]
                }));
            })
            .await;

        let nav = source_for(&server).latest_nav(&IsinFixtures::absl()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(nav.value, dec!(812.3051));
        assert_eq!(nav.nav_date.to_string(), "2024-06-28");
        assert_eq!(nav.source.as_deref(), Some("http"));
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/mf/INF209K01YN0");
                then.status(404);
            })
            .await;

        let err = source_for(&server).latest_nav(&IsinFixtures::absl()).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/mf/INF209K01YN0");
                then.status(503);
            })
            .await;

        let err = source_for(&server).latest_nav(&IsinFixtures::absl()).await.unwrap_err();

        assert!(matches!(err, PortError::ServiceUnavailable { .. }));
        assert_eq!(mock.hits_async().await, 3);
    }

    #[tokio::test]
    async fn test_empty_data_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/mf/INF209K01YN0");
                then.status(200).json_body(json!({"meta": {}, "data": [], "status": "SUCCESS"}));
            })
            .await;

        let err = source_for(&server).latest_nav(&IsinFixtures::absl()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/mf/INF209K01YN0");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let err = source_for(&server).latest_nav(&IsinFixtures::absl()).await.unwrap_err();
        assert!(matches!(err, PortError::Transformation { .. }));
    }

    #[tokio::test]
    async fn test_code_override_changes_path() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/mf/119551");
                then.status(200)
                    .json_body(json!({"data": [{"date": "28-06-2024", "nav": 45.12}]}));
            })
            .await;

        let mut config = source_for(&server).config().clone();
        config
            .code_overrides
            .insert(IsinFixtures::absl().to_string(), "119551".to_string());
        let source = HttpNavSource::new(config).unwrap();

        let nav = source.latest_nav(&IsinFixtures::absl()).await.unwrap();
        mock.assert_async().await;
        assert_eq!(nav.value, dec!(45.12));
        assert_eq!(nav.isin, IsinFixtures::absl());
    }

    #[tokio::test]
    async fn test_batch_fetch_collects_failures() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/mf/INF209K01YN0");
                then.status(200).json_body(json!({"data": [{"date": "28-06-2024", "nav": "10"}]}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/mf/INF179K01BE2");
                then.status(404);
            })
            .await;

        let source = source_for(&server);
        let fetch = fetch_latest_navs(&source, [IsinFixtures::absl(), IsinFixtures::hdfc()], 4).await;

        assert_eq!(fetch.prices.get(&IsinFixtures::absl()), Some(dec!(10)));
        assert_eq!(fetch.failures.len(), 1);
        assert_eq!(fetch.failures[0].isin, IsinFixtures::hdfc());
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/mf/119551");
                then.status(200).json_body(json!({"data": [{"date": "28-06-2024", "nav": "1"}]}));
            })
            .await;

        let unconfigured = source_for(&server);
        assert_eq!(unconfigured.health_check().await.status, AdapterHealth::Unknown);

        let mut config = unconfigured.config().clone();
        config.health_code = Some("119551".to_string());
        let source = HttpNavSource::new(config).unwrap();
        assert_eq!(source.health_check().await.status, AdapterHealth::Healthy);
    }
}

// ============================================================================
// Statement Source Tests
// ============================================================================

mod statement_tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("infra_data_{}_{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_from_file() {
        let path = write_temp("three_trades.json", StatementFixtures::three_trades());
        let txs = JsonTransactionSource::from_path(&path).load().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(txs.len(), 3);
        assert_eq!(txs[2].units, dec!(-12));
        assert_eq!(txs[2].amount, dec!(1500));
    }

    #[test]
    fn test_missing_file_is_source_error() {
        let err = JsonTransactionSource::from_path("/nonexistent/statement.json")
            .load()
            .unwrap_err();
        assert!(matches!(err, PortfolioError::Source(_)));
    }

    #[test]
    fn test_missing_units_fails_fast() {
        let err = JsonTransactionSource::from_json(StatementFixtures::missing_units())
            .load()
            .unwrap_err();
        assert!(matches!(err, PortfolioError::DataFormat { index: 1, .. }));
    }

    #[test]
    fn test_wrong_shape_is_data_format() {
        let err = JsonTransactionSource::from_json(r#"{"rows": []}"#).load().unwrap_err();
        assert!(matches!(err, PortfolioError::DataFormat { .. }));
    }

    #[test]
    fn test_builder_round_trips_through_statement() {
        let scenario = ScenarioBuilder::new()
            .buy(IsinFixtures::hdfc(), dec!(2.5), dec!(812.3), 0)
            .sell(IsinFixtures::hdfc(), dec!(1), dec!(820), 5)
            .in_folio(FolioFixtures::secondary())
            .buy(IsinFixtures::hdfc(), dec!(4), dec!(815), 6);

        let loaded = JsonTransactionSource::from_json(scenario.to_statement_json())
            .load()
            .unwrap();
        assert_eq!(loaded[2].folio, FolioFixtures::secondary());
        assert_eq!(loaded, scenario.build());
    }
}

// ============================================================================
// End-to-End Tests
// ============================================================================

mod end_to_end_tests {
    use super::*;

    #[tokio::test]
    async fn test_statement_and_static_prices() {
        let txs = JsonTransactionSource::from_json(StatementFixtures::three_trades())
            .load()
            .unwrap();
        let prices = StaticNavSource::new([(IsinFixtures::absl(), dec!(130))], DateFixtures::year_end());
        let service = PortfolioService::new(Arc::new(prices), ValuationSettings::default());

        let report = service.evaluate(&txs, DateFixtures::year_end()).await;

        assert_eq!(report.summary.total_acquisition_cost, dec!(360));
        assert_eq!(report.summary.total_market_value, dec!(390));
        assert_eq!(report.summary.total_unrealized_gain, dec!(30));
        assert!(report.xirr.is_ok());
    }
}
