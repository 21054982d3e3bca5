use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde_json::json;

use meridian_common::ApiError;

use crate::routes::AppState;

pub async fn summary(State(state): State<Arc<AppState>>) -> Response {
    match state.store.analytics_summary().await {
        Ok(summary) => Json(json!({
            "users": summary.users,
            "orders": {
                "count": summary.order_count,
                "total_amount": summary.total_amount,
                "average_amount": summary.average_amount,
            },
            "region": state.config.region,
            "timestamp": Utc::now().to_rfc3339(),
        }))
        .into_response(),
        Err(e) => ApiError::Internal(e.to_string()).to_response(&state.config.region),
    }
}
