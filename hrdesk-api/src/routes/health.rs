/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "connections": { "active": 1, "idle": 4 }
/// }
/// ```
///
/// Always 200; a failed database probe reports `"degraded"`.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use hrdesk_shared::db::pool::{get_pool_stats, health_check as probe_database};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    pub connections: ConnectionCounts,
}

/// Pool usage at the time of the check
#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectionCounts {
    pub active: usize,
    pub idle: usize,
}

pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let connected = match probe_database(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health probe failed");
            false
        }
    };

    let stats = get_pool_stats(&state.db);

    Ok(Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        connections: ConnectionCounts {
            active: stats.active_connections,
            idle: stats.idle_connections,
        },
    }))
}
