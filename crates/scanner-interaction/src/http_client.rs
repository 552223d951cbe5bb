//! HttpAnalysisClient - REST client for the AI Opportunity Scanner API.
//!
//! Talks to two endpoints:
//! - `POST /api/analyze` to run an analysis
//! - `GET /api/health` to probe the service
//!
//! Failures are classified into [`AnalysisError`] variants. The message of
//! a failed response comes from its `detail` field when there is one.

use crate::config::ClientConfig;
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use scanner_core::analysis::{
    AnalysisClient, AnalysisError, AnalysisRequest, AnalysisResponse, HealthStatus,
};
use serde::de::DeserializeOwned;
use std::time::Duration;

const ANALYZE_PATH: &str = "/api/analyze";
const HEALTH_PATH: &str = "/api/health";

/// Analysis client over HTTP with bounded automatic retry.
#[derive(Clone)]
pub struct HttpAnalysisClient {
    client: Client,
    config: ClientConfig,
    retry: RetryPolicy,
}

impl HttpAnalysisClient {
    /// Creates a client from the given configuration.
    pub fn new(config: ClientConfig) -> Self {
        let retry = RetryPolicy::new(
            config.max_retries,
            Duration::from_millis(config.initial_backoff_ms),
        );
        Self {
            client: Client::new(),
            config,
            retry,
        }
    }

    /// Loads configuration from config.toml or environment variables.
    pub fn try_from_env() -> scanner_core::Result<Self> {
        Ok(Self::new(ClientConfig::load()?))
    }

    /// Replaces the retry policy derived from the config.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn with_timeout(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.request_timeout() {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    /// One `POST /api/analyze` attempt.
    async fn post_analysis(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResponse, AnalysisError> {
        let url = self.config.endpoint(ANALYZE_PATH);
        tracing::debug!(session_id = %request.session_id, "POST {}", url);

        let response = self
            .with_timeout(self.client.post(&url).json(request))
            .send()
            .await
            .map_err(|e| AnalysisError::network(format!("Failed to reach analysis service: {}", e)))?;

        read_response(response).await
    }
}

/// Reads a response body, classifying failures.
async fn read_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AnalysisError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AnalysisError::network(format!("Failed to read response body: {}", e)))?;

    if !status.is_success() {
        return Err(classify_failure(status, &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| AnalysisError::decode(format!("Failed to parse analysis response: {}", e)))
}

/// Maps a non-2xx response to a classified error with a user-facing message.
fn classify_failure(status: StatusCode, body: &str) -> AnalysisError {
    let message = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(payload) => payload
            .get("detail")
            .and_then(|detail| detail.as_str())
            .filter(|detail| !detail.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16())),
        Err(_) => "Unknown error".to_string(),
    };

    classify_status(status, message)
}

/// 4xx is `Client`, 5xx is `Server`. Any other non-2xx status (an
/// informational or unfollowed redirect response) is not a usable
/// analysis response and is reported as `Decode`, which is never retried.
fn classify_status(status: StatusCode, message: String) -> AnalysisError {
    if status.is_client_error() {
        AnalysisError::client(status.as_u16(), message)
    } else if status.is_server_error() {
        AnalysisError::server(status.as_u16(), message)
    } else {
        AnalysisError::decode(format!(
            "Unexpected response status {}: {}",
            status.as_u16(),
            message
        ))
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    /// Submits the request, retrying network and server failures per the retry policy.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        self.retry
            .run("analyze", || self.post_analysis(request))
            .await
    }

    async fn health_check(&self) -> Result<HealthStatus, AnalysisError> {
        let url = self.config.endpoint(HEALTH_PATH);
        let response = self
            .with_timeout(self.client.get(&url))
            .send()
            .await
            .map_err(|e| AnalysisError::network(format!("Health check failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = format!("Health check failed: {}", status.as_u16());
            return Err(classify_status(status, message));
        }

        read_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_message_is_used() {
        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, r#"{"detail":"rate limited"}"#);
        assert_eq!(err, AnalysisError::client(429, "rate limited"));
    }

    #[test]
    fn test_missing_detail_falls_back_to_status() {
        let err = classify_failure(StatusCode::BAD_GATEWAY, r#"{"error":"upstream"}"#);
        assert_eq!(err, AnalysisError::server(502, "HTTP error! status: 502"));
    }

    #[test]
    fn test_non_string_detail_falls_back_to_status() {
        let body = r#"{"detail":[{"loc":["body","industry"],"msg":"value is not a valid enumeration member"}]}"#;
        let err = classify_failure(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(err, AnalysisError::client(422, "HTTP error! status: 422"));
    }

    #[test]
    fn test_unfollowed_redirect_is_decode_failure_and_not_retried() {
        let err = classify_failure(StatusCode::MULTIPLE_CHOICES, r#"{"detail":"moved"}"#);
        assert_eq!(
            err,
            AnalysisError::decode("Unexpected response status 300: moved")
        );
        assert!(!err.is_retryable());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_server_status_is_retryable() {
        let err = classify_failure(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err, AnalysisError::server(503, "Unknown error"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_non_json_body_is_unknown_error() {
        let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err, AnalysisError::server(500, "Unknown error"));
    }
}
