//! Authoritative session snapshot

use serde::{Deserialize, Serialize};

/// Nested character attributes shown in the status panel.
///
/// Values are arbitrary JSON (scalars, nested maps, sequences) and are only
/// ever displayed. Key order follows the server.
pub type LifeAttributes = serde_json::Map<String, serde_json::Value>;

/// Full session state as pushed by the server.
///
/// A new snapshot always replaces the previous one; clients never merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Server is still working on a previously submitted action
    pub is_processing: bool,
    /// Trial attempts left for today (may go negative once exhausted)
    pub opportunities_remaining: i64,
    pub is_in_trial: bool,
    pub daily_success_achieved: bool,
    /// Narrative log, always delivered in full
    #[serde(default)]
    pub display_history: Vec<String>,
    /// Current incarnation's attributes, `None` between lives
    #[serde(default)]
    pub current_life: Option<LifeAttributes>,
}
