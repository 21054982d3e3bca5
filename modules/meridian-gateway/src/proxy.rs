use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;
use tracing::warn;

use meridian_client::CallOutcome;
use meridian_common::ApiError;

use crate::routes::AppState;

/// Bound on the proxied ingest call.
pub const PROXY_TIMEOUT: Duration = Duration::from_secs(10);

/// Pure pass-through to the collector's single-ingest endpoint: the payload
/// goes over verbatim and the collector's status and body come back
/// unchanged. The gateway does no validation of its own here.
pub async fn ingest_proxy(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> Response {
    match state
        .ingest
        .post_json("/api/v1/ingest", &body, PROXY_TIMEOUT)
        .await
    {
        CallOutcome::Success { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(body)).into_response()
        }
        CallOutcome::DependencyFailure { reason } => {
            warn!(reason = %reason, "Ingest service unreachable");
            ApiError::Dependency(reason).to_response(&state.config.region)
        }
    }
}
