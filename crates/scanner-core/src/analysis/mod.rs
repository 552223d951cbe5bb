//! Analysis domain module.
//!
//! - `model`: request/response types and the industry enumeration
//! - `client`: the [`AnalysisClient`] trait and [`AnalysisError`] classification

mod client;
mod model;

pub use client::{AnalysisClient, AnalysisError};
pub use model::{
    AnalysisRequest, AnalysisResponse, AnalysisResult, HealthStatus, Industry,
    MIN_DESCRIPTION_CHARS,
};
