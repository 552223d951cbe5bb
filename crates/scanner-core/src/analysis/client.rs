//! Analysis client trait and failure classification.

use super::model::{AnalysisRequest, AnalysisResponse, HealthStatus};
use async_trait::async_trait;
use thiserror::Error;

/// A classified failure from the remote analysis service.
///
/// The `Display` output is the human-readable message shown to the user.
/// Implementations of [`AnalysisClient`] are responsible for choosing it
/// (remote `detail` field or a fallback).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Transport-level failure, no response received.
    #[error("{message}")]
    Network { message: String },

    /// 4xx response. Never retried automatically.
    #[error("{message}")]
    Client { status: u16, message: String },

    /// 5xx response.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A response that is not a usable analysis: a 2xx body that does not
    /// parse, or a status outside 2xx/4xx/5xx.
    #[error("{message}")]
    Decode { message: String },
}

impl AnalysisError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn client(status: u16, message: impl Into<String>) -> Self {
        Self::Client {
            status,
            message: message.into(),
        }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Message to surface to the user.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network { message }
            | Self::Client { message, .. }
            | Self::Server { message, .. }
            | Self::Decode { message } => message,
        }
    }

    /// Whether an automatic transport-level retry may help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Server { .. })
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Network { .. } | Self::Decode { .. } => None,
        }
    }
}

/// An abstract client for the remote analysis service.
///
/// Decouples the orchestrator from the transport so tests can bind an
/// in-memory fake. Implementations may retry internally; whatever they
/// return is final from the orchestrator's point of view.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Submits a job description for analysis.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError>;

    /// Probes the service health endpoint.
    async fn health_check(&self) -> Result<HealthStatus, AnalysisError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(AnalysisError::network("connection refused").is_retryable());
        assert!(AnalysisError::server(503, "unavailable").is_retryable());
        assert!(!AnalysisError::client(429, "rate limited").is_retryable());
        assert!(!AnalysisError::decode("missing field").is_retryable());
    }

    #[test]
    fn test_status_only_for_responses() {
        assert_eq!(AnalysisError::client(404, "nope").status(), Some(404));
        assert_eq!(AnalysisError::network("down").status(), None);
    }
}
