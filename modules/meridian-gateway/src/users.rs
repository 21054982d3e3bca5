use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use meridian_client::CallOutcome;
use meridian_common::ApiError;
use meridian_store::StoreError;

use crate::routes::AppState;

/// Bound on the remote validation call.
pub const VALIDATE_TIMEOUT: Duration = Duration::from_secs(5);

/// Listing cap, regardless of caller input. No pagination.
pub const LIST_USERS_CAP: i64 = 100;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    username: Option<String>,
    email: Option<String>,
}

/// Validate remotely, then write locally. The gateway owns the user insert;
/// the validator is only consulted. Between its uniqueness check and our
/// insert a concurrent creation can win the race; the store's unique
/// constraint is the backstop, surfaced as a 400.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserRequest>,
) -> Response {
    let (Some(username), Some(email)) = (body.username, body.email) else {
        return ApiError::ClientInput("username and email are required")
            .to_response(&state.config.region);
    };

    let outcome = state
        .validator
        .post_json(
            "/api/v1/validate/user",
            &json!({ "username": &username, "email": &email }),
            VALIDATE_TIMEOUT,
        )
        .await;

    match outcome {
        CallOutcome::Success { status: 200, .. } => {}
        CallOutcome::Success { status: 400, body } => {
            // Relay the validator's itemized reasons to the caller.
            let errors: Vec<String> = body
                .get("errors")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|e| e.as_str().map(String::from))
                        .collect()
                })
                .unwrap_or_default();
            return ApiError::ValidationRejected(errors).to_response(&state.config.region);
        }
        CallOutcome::Success { status, .. } => {
            warn!(status, "Validator returned unexpected status");
            return ApiError::Dependency(format!("validator returned status {status}"))
                .to_response(&state.config.region);
        }
        CallOutcome::DependencyFailure { reason } => {
            warn!(reason = %reason, "Validator unreachable");
            return ApiError::Dependency(reason).to_response(&state.config.region);
        }
    }

    match state.store.insert_user(&username, &email).await {
        Ok(user) => {
            info!(user_id = user.id, region = %state.config.region, "User created");
            (
                StatusCode::CREATED,
                Json(json!({ "user": user, "region": state.config.region })),
            )
                .into_response()
        }
        Err(StoreError::Conflict(message)) => {
            ApiError::Conflict(message).to_response(&state.config.region)
        }
        Err(e) => ApiError::Internal(e.to_string()).to_response(&state.config.region),
    }
}

pub async fn list_users(State(state): State<Arc<AppState>>) -> Response {
    match state.store.list_recent_users(LIST_USERS_CAP).await {
        Ok(users) => Json(json!({
            "users": users,
            "count": users.len(),
            "region": state.config.region,
        }))
        .into_response(),
        Err(e) => ApiError::Internal(e.to_string()).to_response(&state.config.region),
    }
}
