//! HTTP adapter for the session API.
//!
//! Every request goes through one `reqwest::Client` backed by the shared
//! cookie jar, so the `token` cookie set at login also rides on the socket
//! handshake.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use tiandao_shared::{ErrorDetail, LoginToken, SessionState};

use crate::infrastructure::endpoint::Endpoints;
use crate::ports::outbound::{ApiError, SessionApiPort};

const SESSION_COOKIE: &str = "token";
const LOGIN_FAILED: &str = "Login failed";
const INIT_FAILED: &str = "Failed to initialize game session";
const REFRESH_FAILED: &str = "Failed to refresh attempts";
const LOGOUT_FAILED: &str = "Logout failed";

/// `SessionApiPort` over reqwest
#[derive(Clone)]
pub struct ApiAdapter {
    client: Client,
    endpoints: Endpoints,
    jar: Arc<Jar>,
}

impl ApiAdapter {
    pub fn new(endpoints: Endpoints, jar: Arc<Jar>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            endpoints,
            jar,
        })
    }

    async fn post_empty(&self, path: &str) -> Result<Response, ApiError> {
        let url = self.endpoints.api(path);
        tracing::debug!(%url, "POST");
        self.client
            .post(url)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))
    }

    /// POST a cookie-authorized request whose 2xx body is a session snapshot.
    async fn post_session(&self, path: &str, fallback: &str) -> Result<SessionState, ApiError> {
        let response = self.post_empty(path).await?;
        match response.status() {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            status if !status.is_success() => Err(ApiError::Status {
                status: status.as_u16(),
                detail: fallback.to_string(),
            }),
            _ => decode(response).await,
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json()
        .await
        .map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

async fn error_detail(response: Response, fallback: &str) -> String {
    match response.json::<ErrorDetail>().await {
        Ok(body) => body.message().unwrap_or(fallback).to_string(),
        Err(_) => fallback.to_string(),
    }
}

#[async_trait]
impl SessionApiPort for ApiAdapter {
    async fn login(&self, username: &str, password: &str) -> Result<LoginToken, ApiError> {
        let response = self
            .client
            .post(self.endpoints.api("login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response, LOGIN_FAILED).await;
            tracing::warn!(status = status.as_u16(), %detail, "Login rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let token: LoginToken = decode(response).await?;
        // Same cookie the server sets; the socket handshake reads it from the jar.
        self.jar.add_cookie_str(
            &format!("{SESSION_COOKIE}={}; Path=/", token.access_token),
            self.endpoints.origin(),
        );
        tracing::info!(username, "Logged in");
        Ok(token)
    }

    async fn init_session(&self) -> Result<SessionState, ApiError> {
        self.post_session("game/init", INIT_FAILED).await
    }

    async fn refresh_attempts(&self) -> Result<SessionState, ApiError> {
        self.post_session("game/refresh-attempts", REFRESH_FAILED).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let response = self.post_empty("logout").await?;
        // Expire the local copy regardless of what the server answered.
        self.jar.add_cookie_str(
            &format!("{SESSION_COOKIE}=; Max-Age=0; Path=/"),
            self.endpoints.origin(),
        );

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                detail: LOGOUT_FAILED.to_string(),
            })
        }
    }
}
