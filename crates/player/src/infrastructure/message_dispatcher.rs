//! Routes decoded server messages to their consumers.
//!
//! Messages are handled one at a time in arrival order; a message is fully
//! dispatched before the next one is looked at.

use tokio::sync::mpsc;

use tiandao_shared::ServerMessage;

use crate::infrastructure::messaging::EventBus;
use crate::ports::outbound::{Notice, PlayerEvent};
use crate::state::{RollOverlay, SessionStore};

#[derive(Clone)]
pub struct ProtocolDispatcher {
    store: SessionStore,
    overlay: RollOverlay,
    events: EventBus,
}

impl ProtocolDispatcher {
    pub fn new(store: SessionStore, overlay: RollOverlay, events: EventBus) -> Self {
        Self {
            store,
            overlay,
            events,
        }
    }

    pub async fn dispatch(&self, message: ServerMessage) {
        match message {
            ServerMessage::FullState { data } => {
                let state = self.store.replace(data);
                self.events.dispatch(PlayerEvent::StateReplaced(state)).await;
            }
            ServerMessage::RollEvent { data } => self.overlay.deliver(data).await,
            ServerMessage::Error { detail } => {
                tracing::warn!(%detail, "Server reported an error");
                self.events
                    .dispatch(PlayerEvent::Notice(Notice::ServerError(detail)))
                    .await;
            }
            ServerMessage::Unknown => {
                tracing::debug!("Ignoring message of unrecognized type");
            }
        }
    }

    /// Drain the inbound channel until every sender is gone.
    pub async fn run(self, mut inbound: mpsc::UnboundedReceiver<ServerMessage>) {
        while let Some(message) = inbound.recv().await {
            tracing::trace!(kind = message.kind(), "Dispatching server message");
            self.dispatch(message).await;
        }
        tracing::debug!("Inbound channel closed, dispatcher stopping");
    }
}
