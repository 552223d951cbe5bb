//! In-process emulation of browser session storage.
//!
//! Entries live as long as the owning process (the "tab") and are never
//! written to disk.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Errors that can occur when writing to tab storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabStorageError {
    /// The write would exceed the storage quota.
    QuotaExceeded {
        key: String,
        required: usize,
        quota: usize,
    },
}

impl std::fmt::Display for TabStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TabStorageError::QuotaExceeded {
                key,
                required,
                quota,
            } => write!(
                f,
                "Quota exceeded writing '{}': {} bytes required, quota is {}",
                key, required, quota
            ),
        }
    }
}

impl std::error::Error for TabStorageError {}

/// A string key/value area scoped to one tab session.
pub trait TabStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: String) -> Result<(), TabStorageError>;

    fn remove_item(&self, key: &str);
}

/// Heap-backed [`TabStorage`] with an optional byte quota.
///
/// The quota covers the sum of key and value lengths over all entries,
/// like the per-origin limit of browser storage.
#[derive(Debug, Default)]
pub struct MemoryTabStorage {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryTabStorage {
    /// Creates an unbounded storage area.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage area that rejects writes beyond `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Bytes currently in use.
    pub fn used_bytes(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl TabStorage for MemoryTabStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), TabStorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let required = others + key.len() + value.len();
            if required > quota {
                return Err(TabStorageError::QuotaExceeded {
                    key: key.to_string(),
                    required,
                    quota,
                });
            }
        }

        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let storage = MemoryTabStorage::new();
        assert_eq!(storage.get_item("k"), None);

        storage.set_item("k", "v".to_string()).unwrap();
        assert_eq!(storage.get_item("k").as_deref(), Some("v"));

        storage.remove_item("k");
        assert_eq!(storage.get_item("k"), None);
        assert_eq!(storage.used_bytes(), 0);
    }

    #[test]
    fn test_quota_rejects_oversized_write_and_keeps_old_value() {
        let storage = MemoryTabStorage::with_quota(10);
        storage.set_item("k", "small".to_string()).unwrap();

        let err = storage
            .set_item("k", "much too large".to_string())
            .unwrap_err();
        assert!(matches!(err, TabStorageError::QuotaExceeded { quota: 10, .. }));
        assert_eq!(storage.get_item("k").as_deref(), Some("small"));
    }

    #[test]
    fn test_quota_counts_replacement_not_sum() {
        let storage = MemoryTabStorage::with_quota(8);
        storage.set_item("k", "1234567".to_string()).unwrap();
        storage.set_item("k", "7654321".to_string()).unwrap();
        assert_eq!(storage.used_bytes(), 8);
    }
}
