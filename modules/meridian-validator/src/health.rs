use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::routes::AppState;

/// Liveness: the process is up and answering. No dependency checks; a
/// live-but-unready node is a valid state.
pub async fn liveness(State(state): State<Arc<AppState>>) -> Response {
    Json(json!({
        "status": "alive",
        "service": state.config.service_name,
        "region": state.config.region,
        "timestamp": Utc::now().to_rfc3339(),
    }))
    .into_response()
}

/// Readiness: one trivial round trip to the store.
pub async fn readiness(State(state): State<Arc<AppState>>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(json!({
            "status": "ready",
            "service": state.config.service_name,
            "region": state.config.region,
            "database": "connected",
            "timestamp": Utc::now().to_rfc3339(),
        }))
        .into_response(),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "reason": format!("database: {e}"),
                })),
            )
                .into_response()
        }
    }
}
