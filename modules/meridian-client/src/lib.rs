//! Typed HTTP client for inter-service calls.
//!
//! Every call carries an explicit timeout and resolves to a `CallOutcome`:
//! either the dependency answered (whatever the status), or it was
//! unreachable / timed out. Nothing is retried; the caller decides what a
//! failure means for its own response.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// Outcome of one remote call.
#[derive(Debug, Clone)]
pub enum CallOutcome {
    /// The service answered. Status may still be an error status.
    Success { status: u16, body: Value },
    /// Connection failure or timeout; the service never answered.
    DependencyFailure { reason: String },
}

impl CallOutcome {
    /// True when the service answered with a 2xx status.
    pub fn is_ok_status(&self) -> bool {
        matches!(self, CallOutcome::Success { status, .. } if (200..300).contains(status))
    }
}

/// Remote service seam with injected timeouts, so tests can substitute a
/// fake dependency without network I/O.
#[async_trait]
pub trait ServiceApi: Send + Sync {
    async fn get_json(&self, path: &str, timeout: Duration) -> CallOutcome;

    async fn post_json(&self, path: &str, body: &Value, timeout: Duration) -> CallOutcome;
}

/// reqwest-backed client for one backend service.
pub struct HttpServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpServiceClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn finish(result: reqwest::Result<reqwest::Response>) -> CallOutcome {
        match result {
            Ok(resp) => {
                let status = resp.status().as_u16();
                // A non-JSON body is relayed as null rather than failing the
                // call; liveness checks only look at the status.
                let body = resp.json::<Value>().await.unwrap_or(Value::Null);
                CallOutcome::Success { status, body }
            }
            Err(e) => CallOutcome::DependencyFailure {
                reason: e.to_string(),
            },
        }
    }
}

#[async_trait]
impl ServiceApi for HttpServiceClient {
    async fn get_json(&self, path: &str, timeout: Duration) -> CallOutcome {
        let result = self.client.get(self.url(path)).timeout(timeout).send().await;
        Self::finish(result).await
    }

    async fn post_json(&self, path: &str, body: &Value, timeout: Duration) -> CallOutcome {
        let result = self
            .client
            .post(self.url(path))
            .timeout(timeout)
            .json(body)
            .send()
            .await;
        Self::finish(result).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_status_only_for_2xx() {
        let ok = CallOutcome::Success { status: 201, body: json!({}) };
        let client_error = CallOutcome::Success { status: 400, body: json!({}) };
        let unreachable = CallOutcome::DependencyFailure { reason: "timed out".into() };

        assert!(ok.is_ok_status());
        assert!(!client_error.is_ok_status());
        assert!(!unreachable.is_ok_status());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = HttpServiceClient::new(reqwest::Client::new(), "http://validator:8081/");
        assert_eq!(client.url("/health/live"), "http://validator:8081/health/live");
    }
}
