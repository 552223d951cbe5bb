//! History domain module.
//!
//! - `model`: the persisted record type ([`SavedAnalysisRecord`])
//! - `store`: the [`HistoryStore`] contract and its capacity constants

mod model;
mod store;

pub use model::SavedAnalysisRecord;
pub use store::{HISTORY_STORAGE_KEY, HistoryStore, MAX_HISTORY_ENTRIES};
