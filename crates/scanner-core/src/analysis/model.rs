//! Analysis request/response domain model.
//!
//! These types mirror the wire contract of the remote analysis service.
//! The analysis payload itself is carried as opaque JSON values: the
//! service owns its schema, the client only requires each section to be
//! present.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Minimum length (in characters, after trimming) of a job description.
pub const MIN_DESCRIPTION_CHARS: usize = 50;

/// The fixed set of industries the analysis service understands.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum Industry {
    Energy,
    Materials,
    Industrials,
    #[serde(rename = "Consumer Discretionary")]
    #[strum(serialize = "Consumer Discretionary")]
    ConsumerDiscretionary,
    #[serde(rename = "Consumer Staples")]
    #[strum(serialize = "Consumer Staples")]
    ConsumerStaples,
    #[serde(rename = "Health Care")]
    #[strum(serialize = "Health Care")]
    HealthCare,
    Financials,
    #[serde(rename = "Information Technology")]
    #[strum(serialize = "Information Technology")]
    InformationTechnology,
    #[serde(rename = "Communication Services")]
    #[strum(serialize = "Communication Services")]
    CommunicationServices,
    Utilities,
    #[serde(rename = "Real Estate")]
    #[strum(serialize = "Real Estate")]
    RealEstate,
}

impl Industry {
    /// All industries in display order.
    pub fn all() -> Vec<Industry> {
        Industry::iter().collect()
    }
}

/// A single analysis submission as sent to the remote service.
///
/// Built once per submission cycle by the orchestrator and never mutated.
/// Serializes to the `POST /api/analyze` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub job_description: String,
    pub industry: Industry,
    /// Not part of the wire payload; kept for the history record title.
    #[serde(skip)]
    pub job_title: String,
    /// Serialized as `null` when absent.
    pub user_email: Option<String>,
    pub session_id: String,
}

/// The AI-generated analysis, passed through unchanged.
///
/// Each section must be present; nested content is not validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub executive_summary: Value,
    pub task_breakdown: Vec<Value>,
    pub automation_workflow: Value,
    pub roi_analysis: Value,
    pub implementation_roadmap: Vec<Value>,
}

/// Successful `POST /api/analyze` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// Server-side row id. Unrelated to the client-generated session id.
    pub id: i64,
    pub analysis: AnalysisResult,
}

/// `GET /api/health` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}
