use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use meridian_common::validation::{static_user_errors, USERNAME_TAKEN};
use meridian_common::ApiError;

use crate::routes::AppState;

#[derive(Deserialize)]
pub struct ValidateUserRequest {
    username: Option<String>,
    email: Option<String>,
}

/// Apply the static rules, then the uniqueness fast-path check against
/// stored users. Uniqueness is only consulted for otherwise well-formed
/// input. All violated rules are reported together.
pub async fn validate_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ValidateUserRequest>,
) -> Response {
    let mut errors = static_user_errors(body.username.as_deref(), body.email.as_deref());

    if errors.is_empty() {
        if let Some(username) = body.username.as_deref() {
            match state.store.find_user_by_username(username).await {
                Ok(Some(_)) => errors.push(USERNAME_TAKEN.to_string()),
                Ok(None) => {}
                Err(e) => return ApiError::Internal(e.to_string()).to_response(&state.config.region),
            }
        }
    }

    if errors.is_empty() {
        Json(json!({ "valid": true, "region": state.config.region })).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "valid": false,
                "errors": errors,
                "region": state.config.region,
            })),
        )
            .into_response()
    }
}
