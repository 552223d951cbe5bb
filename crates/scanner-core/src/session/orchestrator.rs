use super::state::{AnalysisDraft, SessionState};
use crate::analysis::{AnalysisClient, AnalysisRequest};
use crate::error::{Result, ScannerError};
use crate::history::{HistoryStore, SavedAnalysisRecord};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Generates a fresh session id, shared by the wire request and the history record.
pub fn generate_session_id() -> String {
    format!("analysis-{}", Uuid::new_v4())
}

/// Drives one user through input, email capture, analysis and results.
///
/// `SessionOrchestrator` is responsible for:
/// - Validating submissions before any state change
/// - Generating the session id for each submission cycle
/// - Invoking the analysis client and recording successes in history
/// - Keeping the failed request around for a manual retry
///
/// Every action either performs exactly one transition or returns an error
/// and leaves the state untouched. The state lock is never held across an
/// await point.
pub struct SessionOrchestrator {
    state: Mutex<SessionState>,
    client: Arc<dyn AnalysisClient>,
    history: Arc<dyn HistoryStore>,
}

impl SessionOrchestrator {
    /// Creates an orchestrator in the `Input` state.
    ///
    /// # Arguments
    ///
    /// * `client` - The remote analysis client
    /// * `history` - The history store successful analyses are written to
    pub fn new(client: Arc<dyn AnalysisClient>, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            state: Mutex::new(SessionState::Input),
            client,
            history,
        }
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.lock_state().clone()
    }

    /// Returns the id of the current submission cycle, if any.
    pub fn session_id(&self) -> Option<String> {
        self.lock_state().session_id().map(str::to_string)
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Accepts a job description, industry and title (`Input -> EmailCapture`).
    ///
    /// # Returns
    ///
    /// The session id generated for this submission cycle.
    ///
    /// # Errors
    ///
    /// - `Validation` if a guard fails; the state stays `Input`
    /// - `InvalidTransition` if the state is not `Input`
    pub fn submit(&self, job_description: &str, industry: &str, job_title: &str) -> Result<String> {
        let mut state = self.lock_state();
        if !matches!(*state, SessionState::Input) {
            return Err(ScannerError::invalid_transition(state.name(), "submit"));
        }

        let draft = AnalysisDraft::validate(job_description, industry, job_title)?;
        let session_id = generate_session_id();

        tracing::info!(
            session_id = %session_id,
            industry = %draft.industry,
            "[Session] Input accepted, awaiting email"
        );

        *state = SessionState::EmailCapture {
            session_id: session_id.clone(),
            draft,
        };

        Ok(session_id)
    }

    /// Returns to the input form, discarding the session id (`EmailCapture -> Input`).
    pub fn back(&self) -> Result<()> {
        let mut state = self.lock_state();
        match &*state {
            SessionState::EmailCapture { session_id, .. } => {
                tracing::info!(session_id = %session_id, "[Session] Back to input");
                *state = SessionState::Input;
                Ok(())
            }
            other => Err(ScannerError::invalid_transition(other.name(), "go back")),
        }
    }

    /// Submits the optional email and waits for the analysis to settle.
    ///
    /// The transition to `Analyzing` is committed on the first poll, before
    /// the network call starts, so a duplicate submission racing this one
    /// is rejected. The request itself runs on a spawned task: dropping
    /// the returned future stops the wait, not the analysis.
    ///
    /// # Returns
    ///
    /// The state the session settled in (`Results` or `Error`, or whatever
    /// the user navigated to while the request was in flight).
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if the state is not `EmailCapture`
    /// - `Internal` if the analysis task panicked
    pub async fn submit_email(self: &Arc<Self>, user_email: Option<String>) -> Result<SessionState> {
        let handle = self.dispatch_email(user_email)?;
        handle
            .await
            .map_err(|e| ScannerError::internal(format!("Analysis task failed: {}", e)))
    }

    /// Fire-and-forget variant of [`submit_email`](Self::submit_email).
    ///
    /// Commits to `Analyzing` before returning and resolves the request on
    /// a spawned task. Must be called within a Tokio runtime.
    pub fn dispatch_email(
        self: &Arc<Self>,
        user_email: Option<String>,
    ) -> Result<JoinHandle<SessionState>> {
        let request = self.begin_analysis(user_email)?;
        let orchestrator = Arc::clone(self);
        Ok(tokio::spawn(
            async move { orchestrator.run_analysis(request).await },
        ))
    }

    /// Moves back to email capture keeping the same session id and inputs (`Error -> EmailCapture`).
    pub fn retry(&self) -> Result<()> {
        let mut state = self.lock_state();
        let SessionState::Error { request, .. } = &*state else {
            return Err(ScannerError::invalid_transition(state.name(), "retry"));
        };

        let session_id = request.session_id.clone();
        let draft = AnalysisDraft::from(request.clone());
        tracing::info!(session_id = %session_id, "[Session] Retrying analysis");

        *state = SessionState::EmailCapture { session_id, draft };
        Ok(())
    }

    /// Discards all retained request state (`Error | Results -> Input`).
    pub fn start_over(&self) -> Result<()> {
        let mut state = self.lock_state();
        match &*state {
            SessionState::Error { .. } | SessionState::Results { .. } => {
                tracing::info!(from = state.name(), "[Session] Starting over");
                *state = SessionState::Input;
                Ok(())
            }
            other => Err(ScannerError::invalid_transition(other.name(), "start over")),
        }
    }

    /// Leaves an in-flight analysis behind (`Analyzing -> Input`).
    ///
    /// The request is not cancelled. If it later succeeds, its record is
    /// still written to history under the abandoned session id.
    pub fn abandon(&self) -> Result<()> {
        let mut state = self.lock_state();
        match &*state {
            SessionState::Analyzing { request } => {
                tracing::info!(
                    session_id = %request.session_id,
                    "[Session] Analysis abandoned while in flight"
                );
                *state = SessionState::Input;
                Ok(())
            }
            other => Err(ScannerError::invalid_transition(other.name(), "abandon")),
        }
    }

    /// Commits `EmailCapture -> Analyzing` and returns the request to send.
    fn begin_analysis(&self, user_email: Option<String>) -> Result<AnalysisRequest> {
        let mut state = self.lock_state();
        let SessionState::EmailCapture { session_id, draft } = &*state else {
            return Err(ScannerError::invalid_transition(state.name(), "submit email"));
        };

        let user_email = user_email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());
        let request = draft.clone().into_request(session_id.clone(), user_email);

        tracing::info!(
            session_id = %request.session_id,
            with_email = request.user_email.is_some(),
            "[Session] Analysis started"
        );

        *state = SessionState::Analyzing {
            request: request.clone(),
        };
        Ok(request)
    }

    /// Awaits the client and applies the outcome.
    ///
    /// On success the record is inserted (and broadcast by the store)
    /// before `Results` becomes observable.
    async fn run_analysis(&self, request: AnalysisRequest) -> SessionState {
        let outcome = self.client.analyze(&request).await;

        match outcome {
            Ok(response) => {
                let record =
                    SavedAnalysisRecord::from_request(&request, response.analysis, chrono::Utc::now());
                self.history.insert(record.clone());

                let mut state = self.lock_state();
                if state.is_analyzing(&request.session_id) {
                    tracing::info!(
                        session_id = %request.session_id,
                        remote_id = response.id,
                        "[Session] Analysis completed"
                    );
                    *state = SessionState::Results { record };
                } else {
                    tracing::warn!(
                        session_id = %request.session_id,
                        current = state.name(),
                        "[Session] Late analysis result recorded after the session moved on"
                    );
                }
                state.clone()
            }
            Err(err) => {
                let mut state = self.lock_state();
                if state.is_analyzing(&request.session_id) {
                    tracing::error!(
                        session_id = %request.session_id,
                        status = ?err.status(),
                        "[Session] Analysis failed: {}",
                        err
                    );
                    *state = SessionState::Error {
                        message: err.user_message().to_string(),
                        request,
                    };
                } else {
                    tracing::warn!(
                        session_id = %request.session_id,
                        "[Session] Dropping late analysis failure: {}",
                        err
                    );
                }
                state.clone()
            }
        }
    }
}
