//! History store backed by tab storage.
//!
//! The whole history is one JSON array under [`HISTORY_STORAGE_KEY`],
//! most recent first. Records are cached in memory for the lifetime of
//! the store; the storage entry is rewritten after every mutation.

use scanner_core::event::{EventChannel, HistoryEvent};
use scanner_core::history::{
    HISTORY_STORAGE_KEY, HistoryStore, MAX_HISTORY_ENTRIES, SavedAnalysisRecord,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::storage::TabStorage;

/// [`HistoryStore`] persisting to a [`TabStorage`] area.
///
/// Write failures (e.g. quota) are logged and swallowed: the in-memory
/// cache keeps the attempted change, so it stays visible until the store
/// is reloaded from storage.
///
/// # Example
///
/// ```ignore
/// let storage = Arc::new(MemoryTabStorage::new());
/// let events = Arc::new(BroadcastEventChannel::new());
/// let history = StorageHistoryStore::new(storage, events);
/// history.insert(record);
/// ```
pub struct StorageHistoryStore {
    storage: Arc<dyn TabStorage>,
    events: Arc<dyn EventChannel>,
    key: String,
    records: Mutex<Vec<SavedAnalysisRecord>>,
}

impl StorageHistoryStore {
    /// Creates a store over the default storage entry and loads its contents.
    pub fn new(storage: Arc<dyn TabStorage>, events: Arc<dyn EventChannel>) -> Self {
        Self::with_key(storage, events, HISTORY_STORAGE_KEY)
    }

    /// Creates a store over a custom storage entry.
    pub fn with_key(
        storage: Arc<dyn TabStorage>,
        events: Arc<dyn EventChannel>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let records = load_records(storage.as_ref(), &key);
        Self {
            storage,
            events,
            key,
            records: Mutex::new(records),
        }
    }

    /// Discards the in-memory cache and re-reads the storage entry.
    pub fn reload(&self) {
        let records = load_records(self.storage.as_ref(), &self.key);
        *self.lock_records() = records;
    }

    fn lock_records(&self) -> MutexGuard<'_, Vec<SavedAnalysisRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, records: &[SavedAnalysisRecord]) {
        let json = match serde_json::to_string(records) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("[History] Failed to serialize history: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.set_item(&self.key, json) {
            tracing::warn!(
                key = %self.key,
                records = records.len(),
                "[History] Failed to persist history: {}",
                e
            );
        }
    }

    /// Announces a change. Called with the records lock released.
    fn notify(&self) {
        self.events.publish(HistoryEvent::Updated);
    }
}

fn load_records(storage: &dyn TabStorage, key: &str) -> Vec<SavedAnalysisRecord> {
    let Some(data) = storage.get_item(key) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<SavedAnalysisRecord>>(&data) {
        Ok(mut records) => {
            records.truncate(MAX_HISTORY_ENTRIES);
            tracing::debug!(key = %key, records = records.len(), "[History] Loaded history");
            records
        }
        Err(e) => {
            tracing::error!(key = %key, "[History] Error reading analysis history: {}", e);
            Vec::new()
        }
    }
}

impl HistoryStore for StorageHistoryStore {
    fn insert(&self, record: SavedAnalysisRecord) {
        {
            let mut records = self.lock_records();
            records.retain(|existing| existing.id != record.id);
            records.insert(0, record);
            if records.len() > MAX_HISTORY_ENTRIES {
                let evicted = records.split_off(MAX_HISTORY_ENTRIES);
                tracing::debug!(evicted = evicted.len(), "[History] Evicted oldest entries");
            }
            self.persist(&records);
        }
        self.notify();
    }

    fn list_all(&self) -> Vec<SavedAnalysisRecord> {
        self.lock_records().clone()
    }

    fn get_by_id(&self, id: &str) -> Option<SavedAnalysisRecord> {
        self.lock_records().iter().find(|r| r.id == id).cloned()
    }

    fn delete_by_id(&self, id: &str) {
        {
            let mut records = self.lock_records();
            let before = records.len();
            records.retain(|r| r.id != id);
            if records.len() == before {
                tracing::debug!(id = %id, "[History] Nothing to delete");
                return;
            }
            self.persist(&records);
        }
        self.notify();
    }

    fn clear_all(&self) {
        self.lock_records().clear();
        self.storage.remove_item(&self.key);
        self.notify();
    }

    fn len(&self) -> usize {
        self.lock_records().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_channel::BroadcastEventChannel;
    use crate::storage::MemoryTabStorage;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use scanner_core::analysis::{AnalysisResult, Industry};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record(n: usize) -> SavedAnalysisRecord {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        SavedAnalysisRecord {
            id: format!("analysis-{}", n),
            title: format!("Role {}", n),
            job_description: "Handles scheduling, vendor follow-ups and monthly reconciliation."
                .to_string(),
            industry: Industry::Industrials,
            analysis: AnalysisResult {
                executive_summary: serde_json::json!({ "total_annual_savings": n }),
                task_breakdown: vec![],
                automation_workflow: serde_json::json!({}),
                roi_analysis: serde_json::json!({}),
                implementation_roadmap: vec![],
            },
            created_at: base + Duration::minutes(n as i64),
        }
    }

    struct Fixture {
        storage: Arc<MemoryTabStorage>,
        store: StorageHistoryStore,
        events: Arc<AtomicUsize>,
    }

    fn fixture_with(storage: MemoryTabStorage) -> Fixture {
        let storage = Arc::new(storage);
        let channel = Arc::new(BroadcastEventChannel::new());
        let events = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&events);
        channel.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let store = StorageHistoryStore::new(storage.clone(), channel);
        Fixture {
            storage,
            store,
            events,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MemoryTabStorage::new())
    }

    fn ids(records: &[SavedAnalysisRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_insert_then_get_round_trips() {
        let f = fixture();
        let r = record(1);

        f.store.insert(r.clone());

        assert_eq!(f.store.get_by_id(&r.id), Some(r));
        assert_eq!(f.store.get_by_id("analysis-missing"), None);
    }

    #[test]
    fn test_list_all_is_most_recent_first_and_idempotent() {
        let f = fixture();
        for n in 1..=3 {
            f.store.insert(record(n));
        }

        let first = f.store.list_all();
        let second = f.store.list_all();

        assert_eq!(ids(&first), vec!["analysis-3", "analysis-2", "analysis-1"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_twenty_first_insert_evicts_oldest() {
        let f = fixture();
        for n in 1..=MAX_HISTORY_ENTRIES {
            f.store.insert(record(n));
        }
        assert_eq!(f.store.len(), MAX_HISTORY_ENTRIES);

        f.store.insert(record(21));

        let records = f.store.list_all();
        assert_eq!(records.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(records[0].id, "analysis-21");
        assert!(f.store.get_by_id("analysis-1").is_none());
        assert!(f.store.get_by_id("analysis-2").is_some());
    }

    #[test]
    fn test_insert_with_existing_id_keeps_ids_unique() {
        let f = fixture();
        f.store.insert(record(1));
        f.store.insert(record(2));

        let mut replacement = record(1);
        replacement.title = "Replaced".to_string();
        f.store.insert(replacement);

        let records = f.store.list_all();
        assert_eq!(ids(&records), vec!["analysis-1", "analysis-2"]);
        assert_eq!(records[0].title, "Replaced");
    }

    #[test]
    fn test_delete_missing_id_leaves_store_unchanged() {
        let f = fixture();
        for n in 1..=3 {
            f.store.insert(record(n));
        }
        let before = f.store.list_all();
        let events_before = f.events.load(Ordering::SeqCst);

        f.store.delete_by_id("analysis-404");

        assert_eq!(f.store.list_all(), before);
        assert_eq!(f.events.load(Ordering::SeqCst), events_before);
    }

    #[test]
    fn test_delete_removes_and_persists() {
        let f = fixture();
        for n in 1..=3 {
            f.store.insert(record(n));
        }

        f.store.delete_by_id("analysis-2");

        assert_eq!(ids(&f.store.list_all()), vec!["analysis-3", "analysis-1"]);
        f.store.reload();
        assert_eq!(ids(&f.store.list_all()), vec!["analysis-3", "analysis-1"]);
    }

    #[test]
    fn test_clear_all_empties_and_broadcasts_once() {
        let f = fixture();
        for n in 1..=3 {
            f.store.insert(record(n));
        }
        let events_before = f.events.load(Ordering::SeqCst);

        f.store.clear_all();

        assert!(f.store.list_all().is_empty());
        assert_eq!(f.events.load(Ordering::SeqCst), events_before + 1);
        assert_eq!(f.storage.get_item(HISTORY_STORAGE_KEY), None);
    }

    #[test]
    fn test_every_mutation_broadcasts_after_persisting() {
        let storage = Arc::new(MemoryTabStorage::new());
        let channel = Arc::new(BroadcastEventChannel::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let reader = Arc::clone(&storage);
        let log = Arc::clone(&seen);
        channel.subscribe(Box::new(move |_| {
            let persisted: Vec<SavedAnalysisRecord> = reader
                .get_item(HISTORY_STORAGE_KEY)
                .map(|json| serde_json::from_str(&json).unwrap())
                .unwrap_or_default();
            log.lock().unwrap().push(persisted.len());
        }));

        let store = StorageHistoryStore::new(storage, channel);
        store.insert(record(1));
        store.insert(record(2));
        store.delete_by_id("analysis-1");
        store.clear_all();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 1, 0]);
    }

    #[test]
    fn test_write_failure_is_swallowed_and_visible_until_reload() {
        let f = fixture_with(MemoryTabStorage::with_quota(64));

        f.store.insert(record(1));

        assert!(f.store.get_by_id("analysis-1").is_some());
        assert_eq!(f.events.load(Ordering::SeqCst), 1);

        f.store.reload();
        assert!(f.store.is_empty());
    }

    #[test]
    fn test_corrupt_entry_loads_as_empty() {
        let storage = MemoryTabStorage::new();
        storage
            .set_item(HISTORY_STORAGE_KEY, "{not json".to_string())
            .unwrap();

        let f = fixture_with(storage);
        assert!(f.store.list_all().is_empty());
    }

    #[test]
    fn test_new_store_reads_existing_entry() {
        let f = fixture();
        f.store.insert(record(1));
        f.store.insert(record(2));

        let channel = Arc::new(BroadcastEventChannel::new());
        let reopened = StorageHistoryStore::new(f.storage.clone(), channel);

        assert_eq!(ids(&reopened.list_all()), vec!["analysis-2", "analysis-1"]);
    }
}
