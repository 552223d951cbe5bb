pub mod event_channel;
pub mod history_store;
pub mod storage;

pub use crate::event_channel::BroadcastEventChannel;
pub use crate::history_store::StorageHistoryStore;
pub use crate::storage::{MemoryTabStorage, TabStorage, TabStorageError};
