//! WebSocket message types
//!
//! Server frames arrive either as JSON text or as gzip-compressed JSON bytes;
//! client frames are always JSON text.

use serde::{Deserialize, Serialize};

use crate::session::SessionState;

// =============================================================================
// Server Messages (Server → Player)
// =============================================================================

/// Messages from the server to the player client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Complete authoritative snapshot, replaces any previous one
    FullState { data: SessionState },
    /// Outcome of a server-side random determination, display only
    RollEvent { data: RollEvent },
    /// Application-level error reported by the server
    Error { detail: String },
    /// Any message kind this client does not know about
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    /// Wire discriminant, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::FullState { .. } => "full_state",
            ServerMessage::RollEvent { .. } => "roll_event",
            ServerMessage::Error { .. } => "error",
            ServerMessage::Unknown => "unknown",
        }
    }
}

/// A judgment roll: success if `result <= target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollEvent {
    /// Judgment category (e.g. "灵根")
    #[serde(rename = "type")]
    pub kind: String,
    pub target: f64,
    pub result: f64,
    /// Outcome label chosen by the server (e.g. "success", "failure")
    pub outcome: String,
}

// =============================================================================
// Client Messages (Player → Server)
// =============================================================================

/// The only message a client ever sends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMessage {
    pub action: String,
}

impl ClientMessage {
    pub fn action(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
        }
    }
}

#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn full_state_scenario_decodes() {
        let json = r#"{"type":"full_state","data":{"is_processing":false,"opportunities_remaining":10,"is_in_trial":false,"daily_success_achieved":false,"display_history":[],"current_life":null}}"#;

        let msg: ServerMessage = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            msg,
            ServerMessage::FullState {
                data: SessionState {
                    is_processing: false,
                    opportunities_remaining: 10,
                    is_in_trial: false,
                    daily_success_achieved: false,
                    display_history: vec![],
                    current_life: None,
                }
            }
        );
    }

    #[test]
    fn roll_event_uses_type_field_for_kind() {
        let json = r#"{"type":"roll_event","data":{"type":"灵根","target":50,"result":37,"outcome":"success"}}"#;

        let msg: ServerMessage = serde_json::from_str(json).expect("deserialize");
        let ServerMessage::RollEvent { data } = msg else {
            panic!("expected roll_event, got {msg:?}");
        };
        assert_eq!(data.kind, "灵根");
        assert_eq!(data.target, 50.0);
        assert_eq!(data.result, 37.0);
        assert_eq!(data.outcome, "success");
    }

    #[test]
    fn error_carries_detail() {
        let msg: ServerMessage =
            serde_json::from_str(r#"{"type":"error","detail":"机缘已尽"}"#).expect("deserialize");
        assert_eq!(
            msg,
            ServerMessage::Error {
                detail: "机缘已尽".to_string()
            }
        );
    }

    #[test]
    fn unknown_kind_is_tolerated() {
        let msg: ServerMessage =
            serde_json::from_str(r#"{"type":"leaderboard","data":[1,2,3]}"#).expect("deserialize");
        assert_eq!(msg, ServerMessage::Unknown);
        assert_eq!(msg.kind(), "unknown");
    }

    #[test]
    fn missing_type_is_rejected() {
        assert!(serde_json::from_str::<ServerMessage>(r#"{"data":{}}"#).is_err());
    }

    #[test]
    fn client_message_is_a_bare_action_object() {
        let json = serde_json::to_string(&ClientMessage::action("探索")).expect("serialize");
        assert_eq!(json, r#"{"action":"探索"}"#);
    }
}
