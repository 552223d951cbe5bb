//! Ephemeral per-tab key/value storage.

mod tab_storage;

pub use tab_storage::{MemoryTabStorage, TabStorage, TabStorageError};
