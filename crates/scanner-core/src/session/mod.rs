//! Session domain module.
//!
//! This module contains the client-side session state machine.
//!
//! # Module Structure
//!
//! - `state`: Session state types (`SessionState`, `AnalysisDraft`)
//! - `orchestrator`: The state machine driving one submission cycle (`SessionOrchestrator`)
//!
//! # Usage
//!
//! ```ignore
//! use scanner_core::session::{SessionOrchestrator, SessionState};
//!
//! let orchestrator = SessionOrchestrator::new(client, history);
//! let session_id = orchestrator.submit(description, "Financials", "Operations Manager")?;
//! let settled = orchestrator.submit_email(None).await?;
//! ```

mod orchestrator;
mod state;


// Re-export public API
pub use orchestrator::{SessionOrchestrator, generate_session_id};
pub use state::{AnalysisDraft, SessionState};
