//! Player events - outbound port data types for the presenter
//!
//! Infrastructure (the dispatcher, the roll overlay, the connection bridge)
//! produces these; the presentation layer consumes them through the
//! [`EventBus`](crate::infrastructure::messaging::EventBus).

use std::fmt;
use std::sync::Arc;

use tiandao_shared::{RollEvent, SessionState};

use super::session_connection_port::ConnectionState;

/// Which top-level view the presenter should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionView {
    Login,
    Game,
}

/// Phase of the transient roll overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPhase {
    /// Event shown with its result hidden
    Masked,
    /// Result and outcome visible
    Revealed,
    /// Nothing displayed
    #[default]
    Dismissed,
}

/// Snapshot of the roll overlay.
///
/// `event` is `None` exactly when `phase` is `Dismissed`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RollOverlayView {
    pub event: Option<RollEvent>,
    pub phase: OverlayPhase,
}

impl RollOverlayView {
    pub fn dismissed() -> Self {
        Self::default()
    }

    pub fn masked(event: RollEvent) -> Self {
        Self {
            event: Some(event),
            phase: OverlayPhase::Masked,
        }
    }

    pub fn revealed(event: RollEvent) -> Self {
        Self {
            event: Some(event),
            phase: OverlayPhase::Revealed,
        }
    }
}

/// User-facing notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// `{"type":"error"}` frame from the server
    ServerError(String),
    /// An action was dropped because the socket was closed
    Disconnected,
    /// A connection attempt failed
    Unreachable,
    /// A refresh-attempts request failed
    RefreshFailed(String),
    /// Login was rejected by the server
    LoginFailed(String),
    /// Credentials failed local validation
    InvalidCredentials(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ServerError(detail) => write!(f, "WebSocket Error: {detail}"),
            Notice::Disconnected => f.write_str("连接已断开，请刷新。"),
            Notice::Unreachable => f.write_str("无法连接。"),
            Notice::RefreshFailed(detail) => write!(f, "重新开始失败: {detail}"),
            Notice::LoginFailed(detail) => f.write_str(detail),
            Notice::InvalidCredentials(detail) => f.write_str(detail),
        }
    }
}

/// Everything the presenter reacts to
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// A full_state frame replaced the session snapshot
    StateReplaced(Arc<SessionState>),
    /// The roll overlay changed phase
    RollOverlay(RollOverlayView),
    /// The socket changed lifecycle state
    ConnectionChanged(ConnectionState),
    /// Loading indicator on/off
    Loading(bool),
    /// Switch between the login and game views
    ViewChanged(SessionView),
    Notice(Notice),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_render_user_text() {
        assert_eq!(
            Notice::ServerError("Game state not found".into()).to_string(),
            "WebSocket Error: Game state not found"
        );
        assert_eq!(Notice::Disconnected.to_string(), "连接已断开，请刷新。");
        assert_eq!(
            Notice::RefreshFailed("Unauthorized".into()).to_string(),
            "重新开始失败: Unauthorized"
        );
    }

    #[test]
    fn default_overlay_is_dismissed() {
        let view = RollOverlayView::default();
        assert_eq!(view.phase, OverlayPhase::Dismissed);
        assert!(view.event.is_none());
    }
}
