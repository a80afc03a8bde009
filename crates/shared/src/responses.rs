//! HTTP response DTOs

use serde::{Deserialize, Serialize};

/// Body of a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginToken {
    pub access_token: String,
    pub token_type: String,
}

/// Error body returned by the server on non-2xx responses.
///
/// `detail` is usually a string but validation failures carry a structured
/// value, so it is kept as raw JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorDetail {
    /// Human readable detail, if the server sent one as plain text
    pub fn message(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|v| v.as_str())
    }
}
