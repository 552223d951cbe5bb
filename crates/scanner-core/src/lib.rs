//! Core domain of the AI Opportunity Scanner client.
//!
//! Holds the session state machine together with the contracts of its
//! collaborators: the analysis client, the history store and the event
//! channel. Concrete implementations live in `scanner-infrastructure` and
//! `scanner-interaction`.

pub mod analysis;
pub mod error;
pub mod event;
pub mod history;
pub mod session;

// Re-export common error type
pub use error::{Result, ScannerError};
