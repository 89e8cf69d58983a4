//! Session event bus.
//!
//! Each editing session owns one `EventBus` behind an `Arc`. Ring edits,
//! selection gestures, camera moves, palette or calibration swaps and project
//! loads are published here; the host UI listens either with synchronous
//! handlers or through a broadcast receiver on its own runtime.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{AppEvent, EventCategory};

/// Broadcast buffer used by [`EventBus::new`]. A burst of ring edits during a
/// paint drag produces one event per pointer move.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.simple().to_string()[..8])
    }
}

/// Which categories a handler wants. An empty filter accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    categories: Vec<EventCategory>,
}

impl EventFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(categories: impl IntoIterator<Item = EventCategory>) -> Self {
        Self {
            categories: categories.into_iter().collect(),
        }
    }

    pub fn matches(&self, event: &AppEvent) -> bool {
        self.categories.is_empty() || self.categories.contains(&event.category())
    }
}

type Handler = Arc<dyn Fn(&AppEvent) + Send + Sync>;

struct Subscriber {
    id: SubscriptionId,
    filter: EventFilter,
    handler: Handler,
}

/// Publish/subscribe hub for session change notifications
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
    subscribers: RwLock<Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus whose broadcast receivers buffer up to `capacity` events before
    /// lagging.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Delivers `event` to matching handlers, in subscription order, and to
    /// every live receiver. Returns how many listeners saw it; zero is normal
    /// for a headless session.
    pub fn publish(&self, event: AppEvent) -> usize {
        tracing::trace!("{}", event.description());

        // Handlers may subscribe or publish themselves, so call them outside
        // the lock.
        let handlers: Vec<Handler> = self
            .subscribers
            .read()
            .iter()
            .filter(|s| s.filter.matches(&event))
            .map(|s| Arc::clone(&s.handler))
            .collect();
        for handler in &handlers {
            handler(&event);
        }

        handlers.len() + self.sender.send(event).unwrap_or(0)
    }

    /// Registers a handler that runs on the publishing thread, inside the
    /// edit that produced the event.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.subscribers.write().push(Subscriber {
            id,
            filter,
            handler: Arc::new(handler),
        });
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Returns true if the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        before != subscribers.len()
    }

    /// Receiver for hosts that poll or await events on their own runtime.
    pub fn receiver(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("receivers", &self.sender.receiver_count())
            .finish()
    }
}
