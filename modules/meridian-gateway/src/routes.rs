use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use meridian_client::ServiceApi;
use meridian_common::AppConfig;
use meridian_store::RecordStore;

use crate::{health, proxy, users};

/// Shared handler state. Store and backend clients sit behind traits so the
/// test suite can run the router against in-process fakes.
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub validator: Arc<dyn ServiceApi>,
    pub ingest: Arc<dyn ServiceApi>,
    pub config: AppConfig,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/api/v1/users", get(users::list_users).post(users::create_user))
        .route("/api/v1/data/ingest", post(proxy::ingest_proxy))
        .route("/api/v1/info", get(info))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
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
        "backend_services": {
            "validator": state.config.validator_url,
            "ingest": state.config.ingest_url,
        },
    }))
}
