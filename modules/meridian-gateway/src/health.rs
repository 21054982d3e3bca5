use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use meridian_client::CallOutcome;

use crate::routes::AppState;

/// Bound on each backend liveness probe.
pub const LIVENESS_TIMEOUT: Duration = Duration::from_secs(2);

/// Liveness: the process is up and answering. No dependency checks.
pub async fn liveness(State(state): State<Arc<AppState>>) -> Response {
    Json(json!({
        "status": "alive",
        "service": state.config.service_name,
        "region": state.config.region,
        "timestamp": Utc::now().to_rfc3339(),
    }))
    .into_response()
}

/// Readiness is transitive for the gateway: the store must answer a ping
/// and both backends must answer their liveness probes within the timeout.
/// Any single failure degrades to 503 with a reason naming the failing
/// domain; it never takes the node down.
pub async fn readiness(State(state): State<Arc<AppState>>) -> Response {
    if let Err(e) = state.store.ping().await {
        warn!(error = %e, "Readiness check failed");
        return not_ready(format!("database: {e}"));
    }

    let backends: [(&str, &Arc<dyn meridian_client::ServiceApi>); 2] = [
        ("validator", &state.validator),
        ("ingest", &state.ingest),
    ];

    for (name, client) in backends {
        match client.get_json("/health/live", LIVENESS_TIMEOUT).await {
            outcome if outcome.is_ok_status() => {}
            CallOutcome::Success { status, .. } => {
                warn!(backend = name, status, "Backend liveness returned non-success");
                return not_ready(format!("{name}_unhealthy: status {status}"));
            }
            CallOutcome::DependencyFailure { reason } => {
                warn!(backend = name, reason = %reason, "Backend liveness failed");
                return not_ready(format!("{name}_unreachable: {reason}"));
            }
        }
    }

    Json(json!({
        "status": "ready",
        "service": state.config.service_name,
        "region": state.config.region,
        "database": "connected",
        "backend_services": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
    .into_response()
}

fn not_ready(reason: String) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "status": "not_ready", "reason": reason })),
    )
        .into_response()
}
