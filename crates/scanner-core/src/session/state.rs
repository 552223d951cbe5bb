//! Session state types.

use crate::analysis::{AnalysisRequest, Industry, MIN_DESCRIPTION_CHARS};
use crate::error::{Result, ScannerError};
use crate::history::SavedAnalysisRecord;
use std::str::FromStr;

/// Validated user input awaiting the optional email step.
///
/// Values are kept exactly as entered; trimming is only applied when
/// checking the guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisDraft {
    pub job_description: String,
    pub industry: Industry,
    pub job_title: String,
}

impl AnalysisDraft {
    /// Checks the submission guards in order: description, industry, title.
    pub fn validate(job_description: &str, industry: &str, job_title: &str) -> Result<Self> {
        if job_description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(ScannerError::validation(
                "job_description",
                format!(
                    "Job description must be at least {} characters long",
                    MIN_DESCRIPTION_CHARS
                ),
            ));
        }

        let industry = match industry.trim() {
            "" => {
                return Err(ScannerError::validation(
                    "industry",
                    "Please select an industry",
                ));
            }
            name => Industry::from_str(name).map_err(|_| {
                ScannerError::validation("industry", format!("Unknown industry: {}", name))
            })?,
        };

        if job_title.trim().is_empty() {
            return Err(ScannerError::validation("job_title", "Please enter a job title"));
        }

        Ok(Self {
            job_description: job_description.to_string(),
            industry,
            job_title: job_title.to_string(),
        })
    }

    /// Builds the immutable wire request for this draft.
    pub fn into_request(self, session_id: String, user_email: Option<String>) -> AnalysisRequest {
        AnalysisRequest {
            job_description: self.job_description,
            industry: self.industry,
            job_title: self.job_title,
            user_email,
            session_id,
        }
    }
}

impl From<AnalysisRequest> for AnalysisDraft {
    fn from(request: AnalysisRequest) -> Self {
        Self {
            job_description: request.job_description,
            industry: request.industry,
            job_title: request.job_title,
        }
    }
}

/// The orchestrator's single mutable state.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Waiting for a job description, industry and title.
    Input,
    /// Input accepted; waiting for an optional email address.
    EmailCapture {
        session_id: String,
        draft: AnalysisDraft,
    },
    /// The remote analysis is in flight.
    Analyzing { request: AnalysisRequest },
    /// The analysis succeeded and was recorded in history.
    Results { record: SavedAnalysisRecord },
    /// The analysis failed; `request` is kept for a manual retry.
    Error {
        message: String,
        request: AnalysisRequest,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::EmailCapture { .. } => "EmailCapture",
            Self::Analyzing { .. } => "Analyzing",
            Self::Results { .. } => "Results",
            Self::Error { .. } => "Error",
        }
    }

    /// The session id of the current submission cycle, if one is active.
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::Input => None,
            Self::EmailCapture { session_id, .. } => Some(session_id),
            Self::Analyzing { request } | Self::Error { request, .. } => Some(&request.session_id),
            Self::Results { record } => Some(&record.id),
        }
    }

    pub(crate) fn is_analyzing(&self, session_id: &str) -> bool {
        matches!(self, Self::Analyzing { request } if request.session_id == session_id)
    }
}
