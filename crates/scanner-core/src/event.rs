//! Cross-component change notifications.
//!
//! Views that render history independently of the orchestrator subscribe
//! to an [`EventChannel`] and re-read the history store whenever an event
//! arrives. Events carry no payload.

/// Name under which the history change event is announced to views.
pub const HISTORY_UPDATED_EVENT: &str = "analysisHistoryUpdated";

/// Events published on the shared channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryEvent {
    /// The history store was mutated; listeners should re-read it.
    Updated,
}

impl HistoryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Updated => HISTORY_UPDATED_EVENT,
        }
    }
}

/// Callback invoked synchronously for each published event.
pub type Listener = Box<dyn Fn(HistoryEvent) + Send + Sync>;

/// Handle returned by [`EventChannel::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A process-wide publish/subscribe bus.
///
/// `publish` must deliver to every current subscriber before it returns.
pub trait EventChannel: Send + Sync {
    /// Delivers `event` to all current subscribers.
    fn publish(&self, event: HistoryEvent);

    /// Registers a listener. It receives every event published afterwards.
    fn subscribe(&self, listener: Listener) -> SubscriptionId;

    /// Removes a listener. Returns `false` if the id was unknown.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
