//! HTTP NAV provider adapter
//!
//! Fetches NAV history from a REST endpoint and returns the latest point.
//! The endpoint is described by a URL template containing `{code}`, which is
//! replaced by the ISIN or by a provider-specific scheme code configured in
//! `code_overrides`.
//!
//! The expected response body is
//!
//! ```json
//! {"data": [{"date": "28-06-2024", "nav": "812.3051"}, ...]}
//! ```
//!
//! # Error Handling
//!
//! Responses are mapped to `PortError` variants:
//! - 404, or a body with no usable points -> `PortError::NotFound`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - Timeouts -> `PortError::Timeout`
//! - Undecodable bodies -> `PortError::Transformation`
//!
//! Transient failures are retried with exponential backoff. A `Retry-After`
//! hint raises the delay, but no wait exceeds the request timeout.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, Isin, PortError};
use domain_portfolio::{Nav, NavHistory, PriceSource};

use crate::error::SourceError;
use crate::values;

const SOURCE_NAME: &str = "http";
const CODE_PLACEHOLDER: &str = "{code}";
const PROVIDER_DATE_FORMAT: &str = "%d-%m-%Y";
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Configuration for the HTTP NAV adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpNavConfig {
    /// Endpoint with a `{code}` placeholder
    pub url_template: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Retries after the first attempt for transient failures
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each further attempt
    pub retry_backoff_ms: u64,

    /// Provider scheme codes keyed by ISIN
    pub code_overrides: HashMap<String, String>,

    /// Code requested by health checks
    pub health_code: Option<String>,
}

impl Default for HttpNavConfig {
    fn default() -> Self {
        Self {
            url_template: "https://api.mfapi.in/mf/{code}".to_string(),
            timeout_secs: 10,
            max_retries: 2,
            retry_backoff_ms: 250,
            code_overrides: HashMap::new(),
            health_code: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NavResponse {
    #[serde(default)]
    data: Vec<NavPoint>,
}

#[derive(Debug, Deserialize)]
struct NavPoint {
    date: String,
    nav: Value,
}

/// NAV source backed by an HTTP provider
#[derive(Debug, Clone)]
pub struct HttpNavSource {
    client: Client,
    config: HttpNavConfig,
}

impl HttpNavSource {
    /// Creates the adapter
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Configuration` if the template lacks `{code}`,
    /// or `SourceError::Client` if the HTTP client cannot be built.
    pub fn new(mut config: HttpNavConfig) -> Result<Self, SourceError> {
        if !config.url_template.contains(CODE_PLACEHOLDER) {
            return Err(SourceError::Configuration(format!(
                "url_template {:?} has no {CODE_PLACEHOLDER} placeholder",
                config.url_template
            )));
        }

        // Environment-sourced keys arrive lowercased
        config.code_overrides = config
            .code_overrides
            .into_iter()
            .map(|(isin, code)| (isin.trim().to_ascii_uppercase(), code))
            .collect();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpNavConfig {
        &self.config
    }

    /// Returns the provider code used for an ISIN
    pub fn code_for<'a>(&'a self, isin: &'a Isin) -> &'a str {
        self.config
            .code_overrides
            .get(isin.as_str())
            .map_or(isin.as_str(), String::as_str)
    }

    /// Builds the request URL for a provider code
    pub fn url_for_code(&self, code: &str) -> String {
        self.config.url_template.replace(CODE_PLACEHOLDER, code)
    }

    async fn fetch_history(&self, isin: &Isin) -> Result<NavHistory, PortError> {
        let url = self.url_for_code(self.code_for(isin));
        let mut attempt = 0;

        loop {
            match self.fetch_once(isin, &url).await {
                Ok(history) => return Ok(history),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    let delay = self.backoff(attempt, &e);
                    warn!(%isin, attempt = attempt + 1, delay_ms = delay.as_millis() as u64, error = %e, "Retrying NAV request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Delay before retry `attempt + 1`, never longer than the request timeout
    fn backoff(&self, attempt: u32, error: &PortError) -> Duration {
        let exponential = self.config.retry_backoff_ms.saturating_mul(1u64 << attempt.min(16));
        Duration::from_millis(exponential)
            .max(error.retry_floor())
            .min(Duration::from_secs(self.config.timeout_secs))
    }

    async fn fetch_once(&self, isin: &Isin, url: &str) -> Result<NavHistory, PortError> {
        debug!(%isin, url, "Requesting NAV history");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.status_error(isin, status, response.headers()));
        }

        let body: NavResponse = response
            .json()
            .await
            .map_err(|e| PortError::transformation(format!("NAV response for {isin}: {e}")))?;

        let history = to_history(isin, body);
        if history.is_empty() {
            return Err(PortError::not_found("Nav", isin));
        }
        Ok(history)
    }

    fn request_error(&self, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::Timeout {
                operation: "latest_nav".to_string(),
                duration_ms: self.config.timeout_secs.saturating_mul(1000),
            }
        } else if error.is_connect() || error.is_request() {
            PortError::connection_from(error)
        } else {
            PortError::internal_from(error)
        }
    }

    fn status_error(&self, isin: &Isin, status: StatusCode, headers: &reqwest::header::HeaderMap) -> PortError {
        match status {
            StatusCode::NOT_FOUND => PortError::not_found("Nav", isin),
            StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited {
                retry_after_secs: headers
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            },
            s if s.is_server_error() => PortError::ServiceUnavailable {
                service: format!("NAV provider ({s})"),
            },
            s => PortError::internal(format!("NAV provider returned {s} for {isin}")),
        }
    }
}

/// Converts provider points into a history, skipping points that do not parse
fn to_history(isin: &Isin, body: NavResponse) -> NavHistory {
    let mut history = NavHistory::new(isin.clone());

    for point in body.data {
        let date = NaiveDate::parse_from_str(point.date.trim(), PROVIDER_DATE_FORMAT);
        let value = values::decimal(&point.nav);
        match (date, value) {
            (Ok(date), Ok(value)) => history.add(Nav::new(isin.clone(), date, value).with_source(SOURCE_NAME)),
            _ => debug!(%isin, date = %point.date, "Skipping unparseable NAV point"),
        }
    }

    history
}

impl DomainPort for HttpNavSource {}

#[async_trait]
impl PriceSource for HttpNavSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    #[instrument(skip(self), fields(isin = %isin))]
    async fn latest_nav(&self, isin: &Isin) -> Result<Nav, PortError> {
        let history = self.fetch_history(isin).await?;
        history
            .latest()
            .cloned()
            .ok_or_else(|| PortError::not_found("Nav", isin))
    }
}

#[async_trait]
impl HealthCheckable for HttpNavSource {
    /// Requests the configured health code and reports whether NAVs came back
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();

        let Some(code) = self.config.health_code.as_deref() else {
            return HealthCheckResult {
                adapter_id: "http-nav-source".to_string(),
                status: AdapterHealth::Unknown,
                latency_ms: 0,
                message: Some("No health_code configured".to_string()),
                checked_at: Utc::now(),
            };
        };

        let result = match Isin::new(code) {
            Ok(isin) => self.fetch_once(&isin, &self.url_for_code(code)).await.map(|_| ()),
            Err(e) => Err(PortError::validation(e.to_string())),
        };
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => HealthCheckResult {
                adapter_id: "http-nav-source".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: "http-nav-source".to_string(),
                status: if e.is_transient() {
                    AdapterHealth::Unhealthy
                } else {
                    AdapterHealth::Degraded
                },
                latency_ms,
                message: Some(e.to_string()),
                checked_at: Utc::now(),
            },
        }
    }
}
