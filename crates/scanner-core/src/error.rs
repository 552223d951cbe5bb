//! Error types for the AI Opportunity Scanner.

use crate::analysis::AnalysisError;
use thiserror::Error;

/// A shared error type for the scanner crates.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScannerError {
    /// Local input validation failed before anything reached the network
    #[error("Validation error: {field} - {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The requested action is not defined for the current session state
    #[error("Cannot {action} while in state {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    /// Classified failure from the remote analysis service
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScannerError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error for the named input field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Creates an InvalidTransition error
    pub fn invalid_transition(state: &'static str, action: &'static str) -> Self {
        Self::InvalidTransition { state, action }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is an InvalidTransition error
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }

    /// Check if this error came from the analysis service
    pub fn is_analysis(&self) -> bool {
        matches!(self, Self::Analysis(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<serde_json::Error> for ScannerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ScannerError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ScannerError>`.
pub type Result<T> = std::result::Result<T, ScannerError>;
