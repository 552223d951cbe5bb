//! History store trait.
//!
//! Defines the interface for the bounded, most-recent-first record cache.

use super::model::SavedAnalysisRecord;

/// Maximum number of records kept. Inserting beyond this evicts the oldest.
pub const MAX_HISTORY_ENTRIES: usize = 20;

/// Name of the ephemeral storage entry holding the JSON-encoded history.
pub const HISTORY_STORAGE_KEY: &str = "ai-opportunity-scanner-history";

/// An abstract store for previously generated analyses.
///
/// All operations are synchronous. Eviction is FIFO by insertion order,
/// not by access recency.
///
/// # Implementation Notes
///
/// Implementations must:
/// - keep records ordered most-recent-first and capped at [`MAX_HISTORY_ENTRIES`]
/// - keep record ids unique
/// - swallow (and log) storage write failures instead of returning them
/// - publish a change notification after every mutation is persisted
pub trait HistoryStore: Send + Sync {
    /// Prepends `record`, truncating to [`MAX_HISTORY_ENTRIES`].
    ///
    /// A record whose id is already present replaces the old entry.
    fn insert(&self, record: SavedAnalysisRecord);

    /// Returns all records, most recent first.
    fn list_all(&self) -> Vec<SavedAnalysisRecord>;

    /// Finds a record by its id.
    fn get_by_id(&self, id: &str) -> Option<SavedAnalysisRecord>;

    /// Removes the matching record. No-op if absent.
    fn delete_by_id(&self, id: &str);

    /// Removes every record.
    fn clear_all(&self);

    fn len(&self) -> usize {
        self.list_all().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
