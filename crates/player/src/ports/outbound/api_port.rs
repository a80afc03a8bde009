//! Session API Port - one-shot HTTP requests
//!
//! All requests are authorized by the ambient session cookie; none of them
//! carry a token in their body or URL.

use async_trait::async_trait;

use tiandao_shared::{LoginToken, SessionState};

/// Errors from the HTTP API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// 401: no valid session cookie. Callers fall back to the login view.
    #[error("Unauthorized")]
    Unauthorized,
    /// Any other non-2xx status, with the server detail or a default message
    #[error("{detail}")]
    Status { status: u16, detail: String },
    /// Transport-level failure (DNS, refused, timeout)
    #[error("Request failed: {0}")]
    RequestFailed(String),
    /// 2xx with a body that does not decode
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionApiPort: Send + Sync {
    /// `POST /api/login` with `username` / `password` form fields
    async fn login(&self, username: &str, password: &str) -> Result<LoginToken, ApiError>;

    /// `POST /api/game/init`
    async fn init_session(&self) -> Result<SessionState, ApiError>;

    /// `POST /api/game/refresh-attempts`
    async fn refresh_attempts(&self) -> Result<SessionState, ApiError>;

    /// `POST /api/logout`
    async fn logout(&self) -> Result<(), ApiError>;
}
