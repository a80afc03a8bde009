//! Session state store.
//!
//! Holds the single authoritative snapshot. Every write replaces the whole
//! value; there is no merging and no partial update.

use std::sync::Arc;

use tokio::sync::watch;

use tiandao_shared::SessionState;

/// Latest session snapshot, absent until the first one arrives.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<watch::Sender<Option<Arc<SessionState>>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self {
            state: Arc::new(state),
        }
    }

    /// Replace the stored snapshot wholesale.
    pub fn replace(&self, next: SessionState) -> Arc<SessionState> {
        let next = Arc::new(next);
        self.state.send_replace(Some(Arc::clone(&next)));
        next
    }

    /// Forget the snapshot, e.g. after logout.
    pub fn clear(&self) {
        self.state.send_replace(None);
    }

    pub fn current(&self) -> Option<Arc<SessionState>> {
        self.state.borrow().clone()
    }

    pub fn is_processing(&self) -> Option<bool> {
        self.state.borrow().as_ref().map(|s| s.is_processing)
    }

    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<SessionState>>> {
        self.state.subscribe()
    }
}
