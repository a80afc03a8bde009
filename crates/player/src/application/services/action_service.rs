//! Action service: gates player actions on the session's processing flag
//!
//! While the server is still working on a previous action (`is_processing`),
//! further actions are held back. The start-trial action is exempt so a stale
//! flag from a finished trial can never lock the player out.

use std::sync::Arc;

use tokio::sync::Mutex;

use tiandao_shared::START_TRIAL_ACTION;

use crate::infrastructure::messaging::EventBus;
use crate::ports::outbound::{Notice, PlayerEvent, SessionConnectionPort};
use crate::state::SessionStore;

/// What happened to a submitted action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Handed to the socket
    Sent,
    /// Held back by the processing flag (or no snapshot yet)
    Blocked,
    /// Nothing to send
    Empty,
    /// Socket was not open; the action is gone
    Dropped,
}

/// Service for sending player actions over the session socket.
///
/// Also owns the action draft (the text input), which is cleared as soon as
/// an action is forwarded and left alone when it is blocked.
#[derive(Clone)]
pub struct ActionService {
    connection: Arc<dyn SessionConnectionPort>,
    store: SessionStore,
    events: EventBus,
    draft: Arc<Mutex<String>>,
}

impl ActionService {
    pub fn new(
        connection: Arc<dyn SessionConnectionPort>,
        store: SessionStore,
        events: EventBus,
    ) -> Self {
        Self {
            connection,
            store,
            events,
            draft: Arc::new(Mutex::new(String::new())),
        }
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        *self.draft.lock().await = text.into();
    }

    #[cfg(test)]
    pub async fn draft(&self) -> String {
        self.draft.lock().await.clone()
    }

    /// Submit the trimmed draft. Typing the start action by hand counts as starting.
    pub async fn submit_draft(&self) -> SubmitOutcome {
        let action = self.draft.lock().await.trim().to_string();
        let is_start = action == START_TRIAL_ACTION;
        self.submit(&action, is_start).await
    }

    pub async fn start_trial(&self) -> SubmitOutcome {
        self.submit(START_TRIAL_ACTION, true).await
    }

    pub async fn submit(&self, action: &str, is_start: bool) -> SubmitOutcome {
        if action.trim().is_empty() {
            return SubmitOutcome::Empty;
        }

        // No snapshot yet counts as busy; only the start action gets through.
        if !is_start && self.store.is_processing() != Some(false) {
            tracing::debug!(action, "Action held back while the session is processing");
            return SubmitOutcome::Blocked;
        }

        self.draft.lock().await.clear();

        match self.connection.send_action(action).await {
            Ok(()) => {
                tracing::debug!(action, is_start, "Action sent");
                SubmitOutcome::Sent
            }
            Err(e) => {
                tracing::warn!(action, error = %e, "Action dropped");
                self.events
                    .dispatch(PlayerEvent::Notice(Notice::Disconnected))
                    .await;
                SubmitOutcome::Dropped
            }
        }
    }
}
