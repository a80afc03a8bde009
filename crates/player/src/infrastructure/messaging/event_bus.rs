//! Event Bus for delivering player events to the presentation layer.
//!
//! Push-based: subscribers register callbacks that are invoked, in
//! registration order, for every dispatched event.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::ports::outbound::player_events::PlayerEvent;

type Subscriber = Box<dyn FnMut(PlayerEvent) + Send + 'static>;

/// Event bus for player events.
///
/// The bus holds strong references to subscribers, so they live as long as
/// the bus does. Clones share the same subscriber list.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to all events.
    pub async fn subscribe(&self, callback: impl FnMut(PlayerEvent) + Send + 'static) {
        self.subscribers.lock().await.push(Box::new(callback));
    }

    /// Dispatch an event to all subscribers.
    ///
    /// Each subscriber's callback is invoked with a clone of the event.
    pub async fn dispatch(&self, event: PlayerEvent) {
        let mut subscribers = self.subscribers.lock().await;
        for subscriber in subscribers.iter_mut() {
            subscriber(event.clone());
        }
    }

    #[cfg(test)]
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    #[cfg(test)]
    pub async fn clear(&self) {
        self.subscribers.lock().await.clear();
    }
}
