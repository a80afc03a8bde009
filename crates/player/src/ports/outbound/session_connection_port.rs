//! Session Connection Port - Outbound port for the realtime session socket
//!
//! Application services (the action gate, the session service) talk to the
//! socket only through this trait, so they can be exercised against a mock.

use std::fmt;

use async_trait::async_trait;

/// Connection state for the session socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Never connected yet
    #[default]
    Disconnected,
    /// Handshake in flight
    Connecting,
    /// Socket established, actions can be sent
    Open,
    /// Connection lost, waiting out the fixed delay before the next attempt
    Reconnecting,
}

impl ConnectionState {
    pub fn is_open(self) -> bool {
        self == ConnectionState::Open
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Reconnecting => "reconnecting",
        };
        f.write_str(label)
    }
}

/// Errors surfaced by the session connection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// An action was issued while the socket was not open; it was dropped
    #[error("连接已断开，请刷新。")]
    Disconnected,
    /// The handshake attempt failed; the reconnect loop keeps retrying
    #[error("无法连接。({0})")]
    Unreachable(String),
    /// The websocket request could not be built
    #[error("invalid websocket request: {0}")]
    InvalidRequest(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionConnectionPort: Send + Sync {
    /// Current lifecycle state
    fn state(&self) -> ConnectionState;

    /// Resolve once the socket is open.
    ///
    /// Returns immediately when already open. Concurrent callers share the
    /// attempt that is in flight.
    async fn connect(&self) -> Result<(), ConnectionError>;

    /// Transmit `{action}` if open, otherwise fail with `Disconnected`.
    ///
    /// Actions are never queued for a later connection.
    async fn send_action(&self, action: &str) -> Result<(), ConnectionError>;

    /// Close the current socket and stop reconnecting.
    ///
    /// The next `connect` performs a new handshake with the current cookies.
    async fn disconnect(&self);
}
