//! Process-wide publish/subscribe bus for history change events.

use scanner_core::event::{EventChannel, HistoryEvent, Listener, SubscriptionId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;

const ASYNC_CHANNEL_CAPACITY: usize = 16;

type SharedListener = Arc<dyn Fn(HistoryEvent) + Send + Sync>;

/// [`EventChannel`] delivering to callbacks synchronously and to async
/// receivers through a `tokio::sync::broadcast` channel.
///
/// Callbacks run on the publishing thread before `publish` returns. The
/// listener list is snapshotted first, so a callback may subscribe,
/// unsubscribe or read the history store without deadlocking.
pub struct BroadcastEventChannel {
    listeners: Mutex<Vec<(SubscriptionId, SharedListener)>>,
    next_id: AtomicU64,
    sender: broadcast::Sender<HistoryEvent>,
}

impl BroadcastEventChannel {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(ASYNC_CHANNEL_CAPACITY);
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            sender,
        }
    }

    /// Returns a receiver for views that await events instead of registering a callback.
    pub fn subscribe_async(&self) -> broadcast::Receiver<HistoryEvent> {
        self.sender.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for BroadcastEventChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl EventChannel for BroadcastEventChannel {
    fn publish(&self, event: HistoryEvent) {
        let snapshot: Vec<SharedListener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        tracing::debug!(
            event = event.name(),
            listeners = snapshot.len(),
            "[EventChannel] Publishing"
        );

        for listener in snapshot {
            listener(event);
        }

        // No async receivers is not an error
        let _ = self.sender.send(event);
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::from(listener)));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}
