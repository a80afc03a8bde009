//! Endpoint derivation from the page origin.
//!
//! `http://host:port` serves the API under `/api/...` and the session socket
//! at `ws://host:port/api/ws`; `https` maps to `wss`.

use url::Url;

const API_PREFIX: &str = "/api/";
const WS_PATH: &str = "/api/ws";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("invalid server URL '{0}': {1}")]
    Parse(String, String),
    #[error("unsupported scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
    #[error("server URL has no host: {0}")]
    MissingHost(String),
}

/// Resolved endpoints for one server origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    origin: Url,
}

impl Endpoints {
    pub fn new(origin: Url) -> Result<Self, EndpointError> {
        match origin.scheme() {
            "http" | "https" => {}
            other => return Err(EndpointError::UnsupportedScheme(other.to_string())),
        }
        if origin.host_str().is_none() {
            return Err(EndpointError::MissingHost(origin.to_string()));
        }

        let mut origin = origin;
        origin.set_path("/");
        origin.set_query(None);
        origin.set_fragment(None);
        Ok(Self { origin })
    }

    pub fn parse(raw: &str) -> Result<Self, EndpointError> {
        let url = Url::parse(raw).map_err(|e| EndpointError::Parse(raw.to_string(), e.to_string()))?;
        Self::new(url)
    }

    /// The page origin, with path `/`
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// `{origin}/api/{path}`
    pub fn api(&self, path: &str) -> Url {
        let mut url = self.origin.clone();
        url.set_path(&format!("{API_PREFIX}{}", path.trim_start_matches('/')));
        url
    }

    /// The session socket URL, `ws(s)://host[:port]/api/ws`.
    pub fn websocket(&self) -> Url {
        let mut url = self.websocket_cookie_url();
        let scheme = if self.origin.scheme() == "https" { "wss" } else { "ws" };
        // http->ws and https->wss are both special-scheme swaps, which Url permits.
        if url.set_scheme(scheme).is_err() {
            tracing::warn!(scheme, "Could not switch URL scheme");
        }
        url
    }

    /// The socket path under the HTTP scheme, used to look up cookies for the handshake
    pub fn websocket_cookie_url(&self) -> Url {
        let mut url = self.origin.clone();
        url.set_path(WS_PATH);
        url
    }
}
