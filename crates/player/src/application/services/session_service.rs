//! Session service - login, session bootstrap and attempt refresh
//!
//! Each operation is a one-shot request whose result either replaces the
//! session snapshot or becomes a notice. A `401` anywhere sends the player
//! back to the login view instead of raising an error.

use std::sync::Arc;

use crate::application::dto::{CredentialError, Credentials};
use crate::infrastructure::messaging::EventBus;
use crate::ports::outbound::{
    ApiError, Notice, PlayerEvent, SessionApiPort, SessionConnectionPort, SessionView,
};
use crate::state::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error(transparent)]
    Invalid(#[from] CredentialError),
    #[error(transparent)]
    Rejected(#[from] ApiError),
}

#[derive(Clone)]
pub struct SessionService {
    api: Arc<dyn SessionApiPort>,
    connection: Arc<dyn SessionConnectionPort>,
    store: SessionStore,
    events: EventBus,
}

impl SessionService {
    pub fn new(
        api: Arc<dyn SessionApiPort>,
        connection: Arc<dyn SessionConnectionPort>,
        store: SessionStore,
        events: EventBus,
    ) -> Self {
        Self {
            api,
            connection,
            store,
            events,
        }
    }

    async fn emit(&self, event: PlayerEvent) {
        self.events.dispatch(event).await;
    }

    /// Fetch the session, open the socket and show the game view.
    ///
    /// Falls back to the login view when the session cannot be fetched.
    pub async fn initialize(&self) -> SessionView {
        self.emit(PlayerEvent::Loading(true)).await;
        let view = self.initialize_inner().await;
        self.emit(PlayerEvent::ViewChanged(view)).await;
        self.emit(PlayerEvent::Loading(false)).await;
        view
    }

    async fn initialize_inner(&self) -> SessionView {
        let state = match self.api.init_session().await {
            Ok(state) => state,
            Err(ApiError::Unauthorized) => {
                tracing::debug!("No valid session cookie, showing login");
                return SessionView::Login;
            }
            Err(e) => {
                tracing::error!(error = %e, "Session initialization failed");
                return SessionView::Login;
            }
        };

        let state = self.store.replace(state);
        self.emit(PlayerEvent::StateReplaced(state)).await;

        if let Err(e) = self.connection.connect().await {
            tracing::warn!(error = %e, "Session socket unavailable, retrying in background");
            self.emit(PlayerEvent::Notice(Notice::Unreachable)).await;
        }
        SessionView::Game
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<SessionView, LoginError> {
        let credentials = match Credentials::new(username, password) {
            Ok(credentials) => credentials,
            Err(e) => {
                self.emit(PlayerEvent::Notice(Notice::InvalidCredentials(e.to_string())))
                    .await;
                return Err(e.into());
            }
        };

        self.emit(PlayerEvent::Loading(true)).await;
        let result = self
            .api
            .login(&credentials.username, &credentials.password)
            .await;

        match result {
            Ok(_) => Ok(self.initialize().await),
            Err(e) => {
                self.emit(PlayerEvent::Notice(Notice::LoginFailed(e.to_string())))
                    .await;
                self.emit(PlayerEvent::Loading(false)).await;
                Err(e.into())
            }
        }
    }

    /// Reset today's attempts; the response replaces the snapshot.
    pub async fn refresh_attempts(&self) -> Result<(), ApiError> {
        self.emit(PlayerEvent::Loading(true)).await;
        let result = self.api.refresh_attempts().await;

        let outcome = match result {
            Ok(state) => {
                let state = self.store.replace(state);
                self.emit(PlayerEvent::StateReplaced(state)).await;
                Ok(())
            }
            Err(ApiError::Unauthorized) => {
                self.emit(PlayerEvent::ViewChanged(SessionView::Login)).await;
                Err(ApiError::Unauthorized)
            }
            Err(e) => {
                tracing::error!(error = %e, "Refresh attempts failed");
                self.emit(PlayerEvent::Notice(Notice::RefreshFailed(e.to_string())))
                    .await;
                Err(e)
            }
        };

        self.emit(PlayerEvent::Loading(false)).await;
        outcome
    }

    /// End the session: expire the cookie, drop the socket and the snapshot.
    ///
    /// The socket authenticated as this user must not outlive the logout, so
    /// the next login handshakes again with its own cookie.
    pub async fn logout(&self) -> SessionView {
        if let Err(e) = self.api.logout().await {
            tracing::warn!(error = %e, "Logout request failed");
        }
        self.connection.disconnect().await;
        self.store.clear();
        self.initialize().await
    }
}
