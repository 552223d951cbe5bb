//! HTTP side of the AI Opportunity Scanner client.
//!
//! Provides [`HttpAnalysisClient`], the reqwest-based implementation of
//! [`scanner_core::analysis::AnalysisClient`], its [`RetryPolicy`] and the
//! [`ClientConfig`] it is built from.

pub mod config;
pub mod http_client;
pub mod retry;

pub use config::ClientConfig;
pub use http_client::HttpAnalysisClient;
pub use retry::RetryPolicy;
