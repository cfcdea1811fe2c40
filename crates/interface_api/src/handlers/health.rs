//! Health check handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use core_kernel::AdapterHealth;

use crate::{error::ApiError, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_source: Option<AdapterHealth>,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        price_source: None,
    })
}

/// Readiness check (includes the NAV provider when it can be probed)
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let price_source = match &state.price_health {
        Some(probe) => {
            let result = probe.health_check().await;
            if result.status == AdapterHealth::Unhealthy {
                return Err(ApiError::Unavailable(
                    result.message.unwrap_or_else(|| "NAV provider unhealthy".to_string()),
                ));
            }
            Some(result.status)
        }
        None => None,
    };

    Ok(Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        price_source,
    }))
}
