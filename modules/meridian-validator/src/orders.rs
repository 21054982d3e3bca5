use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use meridian_common::ApiError;

use crate::routes::AppState;

#[derive(Deserialize)]
pub struct ProcessOrderRequest {
    user_id: Option<i64>,
    amount: Option<f64>,
}

/// Verify the referenced user exists, then create the order. The existence
/// check and the insert are two separate store operations; deletion is not
/// exposed, so the window between them is accepted. Not idempotent:
/// identical submissions create distinct orders.
pub async fn process_order(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ProcessOrderRequest>,
) -> Response {
    let (Some(user_id), Some(amount)) = (body.user_id, body.amount) else {
        return ApiError::ClientInput("user_id and amount are required")
            .to_response(&state.config.region);
    };

    let user = match state.store.find_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return ApiError::NotFound("user").to_response(&state.config.region),
        Err(e) => return ApiError::Internal(e.to_string()).to_response(&state.config.region),
    };

    match state.store.insert_order(user_id, amount).await {
        Ok(order) => {
            info!(order_id = order.id, user_id, region = %state.config.region, "Order processed");
            (
                StatusCode::CREATED,
                Json(json!({
                    "order": order,
                    "user": user,
                    "region": state.config.region,
                })),
            )
                .into_response()
        }
        Err(e) => ApiError::Internal(e.to_string()).to_response(&state.config.region),
    }
}
