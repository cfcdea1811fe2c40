//! Ports and Adapters Infrastructure
//!
//! The portfolio domain talks to the outside world (statement files, NAV
//! providers) only through port traits. Each port is defined in the domain
//! crate; adapters in `infra_data` implement them.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │            PortfolioService              │
//! └──────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌──────────────────────────────────────────┐
//! │   TransactionSource / PriceSource ports  │
//! └──────────────────────────────────────────┘
//!            ▲                      ▲
//!   ┌────────┴────────┐   ┌─────────┴────────┐
//!   │  JSON statement │   │  HTTP / static   │
//!   │     adapter     │   │   NAV adapters   │
//!   └─────────────────┘   └──────────────────┘
//! ```
//!
//! This module holds the shared error type and the marker traits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a statement or NAV adapter
///
/// The service only needs to know whether a lookup may succeed on retry and
/// whether the security is simply unknown to the provider.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// Input the adapter refuses to send upstream
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout { operation: String, duration_ms: u64 },

    /// Provider asked us to back off
    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Service unavailable: {service}")]
    ServiceUnavailable { service: String },

    /// Payload arrived but could not be read as NAVs or transactions
    #[error("Transformation error: {message}")]
    Transformation { message: String },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation { message: message.into() }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection { message: message.into(), source: None }
    }

    /// Connection failure that keeps the underlying error as its source
    pub fn connection_from<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PortError::Connection {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal { message: message.into(), source: None }
    }

    /// Internal failure that keeps the underlying error as its source
    pub fn internal_from<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PortError::Internal {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    /// Whether the same request may succeed if repeated
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::RateLimited { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    /// Shortest wait the provider asked for before the next attempt
    pub fn retry_floor(&self) -> Duration {
        match self {
            PortError::RateLimited { retry_after_secs } => Duration::from_secs(*retry_after_secs),
            _ => Duration::ZERO,
        }
    }
}

/// Marker trait for all domain ports
///
/// Ports are shared across tasks during concurrent price fetches.
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    Degraded,
    Unhealthy,
    Unknown,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: DateTime<Utc>,
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    async fn health_check(&self) -> HealthCheckResult;
}
