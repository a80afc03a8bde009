//! Connection state observation.
//!
//! The socket client publishes its lifecycle on a watch channel; this
//! observer lets collaborators read it or wait for changes without owning
//! the client.

use tokio::sync::watch;

use crate::ports::outbound::ConnectionState;

/// Observable connection state for UI binding.
#[derive(Clone)]
pub struct ConnectionStateObserver {
    state: watch::Receiver<ConnectionState>,
}

impl ConnectionStateObserver {
    pub fn new(state: watch::Receiver<ConnectionState>) -> Self {
        Self { state }
    }

    #[cfg(test)]
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    /// Wait for the next state change and return the new state.
    ///
    /// Returns `None` once the client has been dropped.
    pub async fn changed(&mut self) -> Option<ConnectionState> {
        self.state.changed().await.ok()?;
        Some(*self.state.borrow_and_update())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_observer_reads_state() {
        let (tx, rx) = watch::channel(ConnectionState::Disconnected);
        let mut observer = ConnectionStateObserver::new(rx);

        assert_eq!(observer.state(), ConnectionState::Disconnected);
        assert!(!observer.is_open());

        tx.send_replace(ConnectionState::Open);
        assert_eq!(observer.changed().await, Some(ConnectionState::Open));
        assert!(observer.is_open());
    }

    #[tokio::test]
    async fn test_changed_ends_when_sender_dropped() {
        let (tx, rx) = watch::channel(ConnectionState::Connecting);
        let mut observer = ConnectionStateObserver::new(rx);
        drop(tx);
        assert_eq!(observer.changed().await, None);
    }
}
