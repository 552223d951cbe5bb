//! Saved analysis record.

use crate::analysis::{AnalysisRequest, AnalysisResult, Industry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed analysis kept in the history store.
///
/// Created once when a request succeeds and never mutated afterwards.
/// Field names are camelCase in the persisted JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAnalysisRecord {
    /// The session id the analysis was requested under.
    pub id: String,
    /// The job title entered at submission.
    pub title: String,
    pub job_description: String,
    pub industry: Industry,
    pub analysis: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

impl SavedAnalysisRecord {
    /// Builds the record for a successful request.
    pub fn from_request(
        request: &AnalysisRequest,
        analysis: AnalysisResult,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: request.session_id.clone(),
            title: request.job_title.clone(),
            job_description: request.job_description.clone(),
            industry: request.industry,
            analysis,
            created_at,
        }
    }

    /// Short relative age for history listings.
    ///
    /// `<n> minutes ago` under an hour, `<n> hours ago` under a day,
    /// otherwise the creation date.
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        let elapsed = now.signed_duration_since(self.created_at);

        if elapsed.num_hours() < 1 {
            format!("{} minutes ago", elapsed.num_minutes().max(0))
        } else if elapsed.num_hours() < 24 {
            format!("{} hours ago", elapsed.num_hours())
        } else {
            self.created_at.format("%Y-%m-%d").to_string()
        }
    }
}
