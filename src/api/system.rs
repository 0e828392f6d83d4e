use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub trend_backend: &'static str,
    /// Database reachability. Absent when trends are stored remotely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<bool>,
    pub live_sessions: usize,
}

/// `GET /api/health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthResponse>> {
    let database = match &state.shared.store {
        Some(store) => Some(match store.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                false
            }
        }),
        None => None,
    };

    let status = if database == Some(false) {
        "degraded"
    } else {
        "ok"
    };

    Json(ApiResponse::success(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        trend_backend: state.shared.trending.backend_name(),
        database,
        live_sessions: state.sessions.len().await,
    }))
}
