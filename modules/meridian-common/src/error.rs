use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy shared by all three services. Boundary handlers convert
/// every failure into exactly one of these; nothing is retried or swallowed.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed required input.
    #[error("{0}")]
    ClientInput(&'static str),

    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Business-rule rejection with itemized reasons.
    #[error("validation failed")]
    ValidationRejected(Vec<String>),

    /// Duplicate caught by the store's uniqueness backstop.
    #[error("{0}")]
    Conflict(String),

    /// A backend service or the store was unreachable or timed out during
    /// an operation. Readiness probes build their own 503 body instead.
    #[error("dependency unavailable: {0}")]
    Dependency(String),

    /// Anything else, store errors included. Rendered opaque to the client;
    /// the underlying cause goes to the log stream only.
    #[error("internal error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ClientInput(_)
            | ApiError::ValidationRejected(_)
            | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Dependency(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the JSON failure body every service shares: at least one
    /// descriptive field plus the originating region tag.
    pub fn to_response(&self, region: &str) -> Response {
        let body = match self {
            ApiError::ValidationRejected(errors) => json!({
                "error": self.to_string(),
                "errors": errors,
                "region": region,
            }),
            ApiError::Internal(cause) => {
                tracing::error!(error = %cause, "Request failed");
                json!({ "error": self.to_string(), "region": region })
            }
            other => json!({ "error": other.to_string(), "region": region }),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(ApiError::ClientInput("x is required").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("user").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::ValidationRejected(vec![]).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Conflict("taken".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Dependency("timed out".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_render_opaque() {
        // The raw cause must not appear in the client-facing message.
        let err = ApiError::Internal("connection refused at 10.0.0.5".into());
        assert_eq!(err.to_string(), "internal error");
    }

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(ApiError::NotFound("user").to_string(), "user not found");
    }
}
