//! Application configuration
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! `folio.toml` in the working directory, and `FOLIO_*` environment
//! variables. Nested keys use a double underscore:
//!
//! ```text
//! FOLIO_PORT=9090
//! FOLIO_VALUATION__OVERSELL=reject
//! FOLIO_PRICE_SOURCE__URL_TEMPLATE=https://navs.example/{code}
//! FOLIO_PRICE_SOURCE__CODE_OVERRIDES__INF209K01YN0=119551
//! ```

use serde::Deserialize;

use domain_portfolio::ValuationSettings;
use infra_data::HttpNavConfig;

const ENV_PREFIX: &str = "FOLIO";
const CONFIG_FILE: &str = "folio";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level or `EnvFilter` directive
    pub log_level: String,
    /// Upper bound on request handling time
    pub request_timeout_secs: u64,
    /// How portfolios are valued
    pub valuation: ValuationSettings,
    /// HTTP NAV provider
    pub price_source: HttpNavConfig,
    /// Static NAV file used instead of the HTTP provider
    pub nav_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            request_timeout_secs: 30,
            valuation: ValuationSettings::default(),
            price_source: HttpNavConfig::default(),
            nav_file: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from `folio.toml` and the environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_portfolio::OversellPolicy;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.valuation.oversell, OversellPolicy::Truncate);
        assert!(config.price_source.url_template.contains("{code}"));
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "port = 9090\n[valuation]\noversell = \"reject\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.valuation.oversell, OversellPolicy::Reject);
        assert_eq!(config.valuation.price_concurrency, 8);
    }
}
