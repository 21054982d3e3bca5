use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;

use meridian_common::AppConfig;
use meridian_store::RecordStore;

use crate::{analytics, health, orders, validate};

/// Shared handler state. The store sits behind the RecordStore trait so the
/// test suite can substitute the in-memory implementation.
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub config: AppConfig,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/api/v1/validate/user", post(validate::validate_user))
        .route("/api/v1/process/order", post(orders::process_order))
        .route("/api/v1/analytics/summary", get(analytics::summary))
        .route("/api/v1/info", get(info))
        .with_state(state)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

async fn info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "service": state.config.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "region": state.config.region,
        "environment": state.config.environment,
        "database_host": state.config.database_host,
    }))
}
