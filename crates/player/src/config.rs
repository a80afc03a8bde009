//! Environment-driven configuration for the player binary.

use std::path::PathBuf;
use std::time::Duration;

use crate::infrastructure::endpoint::{EndpointError, Endpoints};
use crate::infrastructure::platform::default_storage_path;
use crate::infrastructure::websocket::RECONNECT_DELAY_MS;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
    #[error("TIANDAO_USERNAME and TIANDAO_PASSWORD must be set together")]
    PartialCredentials,
}

#[derive(Debug, Clone)]
pub struct PlayerConfig {
    pub endpoints: Endpoints,
    pub reconnect_delay: Duration,
    pub request_timeout: Duration,
    /// Credentials for non-interactive login, if both were provided
    pub auto_login: Option<(String, String)>,
    pub prefs_path: PathBuf,
}

impl PlayerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let server_url = var("TIANDAO_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.into());
        let endpoints = Endpoints::parse(&server_url)?;

        let reconnect_delay = Duration::from_millis(parse_positive(
            "TIANDAO_RECONNECT_DELAY_MS",
            var("TIANDAO_RECONNECT_DELAY_MS"),
            RECONNECT_DELAY_MS,
        )?);
        let request_timeout = Duration::from_secs(parse_positive(
            "TIANDAO_REQUEST_TIMEOUT_SECS",
            var("TIANDAO_REQUEST_TIMEOUT_SECS"),
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);

        // Passwords are taken verbatim; only emptiness is checked.
        let username = var("TIANDAO_USERNAME");
        let password = lookup("TIANDAO_PASSWORD").filter(|v| !v.is_empty());
        let auto_login = match (username, password) {
            (Some(u), Some(p)) => Some((u, p)),
            (None, None) => None,
            _ => return Err(ConfigError::PartialCredentials),
        };

        let prefs_path = var("TIANDAO_PREFS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_storage_path);

        Ok(Self {
            endpoints,
            reconnect_delay,
            request_timeout,
            auto_login,
            prefs_path,
        })
    }
}

fn parse_positive(name: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidNumber { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<PlayerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PlayerConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_match_the_local_server() {
        let cfg = config(&[]).expect("defaults");
        assert_eq!(cfg.endpoints.websocket().as_str(), "ws://127.0.0.1:8000/api/ws");
        assert_eq!(cfg.reconnect_delay, Duration::from_millis(5_000));
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert!(cfg.auto_login.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = config(&[
            ("TIANDAO_SERVER_URL", "https://dao.example.com"),
            ("TIANDAO_RECONNECT_DELAY_MS", "250"),
            ("TIANDAO_USERNAME", "alice"),
            ("TIANDAO_PASSWORD", " secret "),
            ("TIANDAO_PREFS_PATH", "/tmp/prefs.json"),
        ])
        .expect("valid");
        assert_eq!(cfg.endpoints.websocket().as_str(), "wss://dao.example.com/api/ws");
        assert_eq!(cfg.reconnect_delay, Duration::from_millis(250));
        assert_eq!(
            cfg.auto_login,
            Some(("alice".to_string(), " secret ".to_string()))
        );
        assert_eq!(cfg.prefs_path, PathBuf::from("/tmp/prefs.json"));
    }

    #[test]
    fn bad_values_are_errors_not_panics() {
        assert!(matches!(
            config(&[("TIANDAO_RECONNECT_DELAY_MS", "soon")]),
            Err(ConfigError::InvalidNumber { name: "TIANDAO_RECONNECT_DELAY_MS", .. })
        ));
        assert!(matches!(
            config(&[("TIANDAO_REQUEST_TIMEOUT_SECS", "0")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            config(&[("TIANDAO_SERVER_URL", "ws://nope")]),
            Err(ConfigError::Endpoint(EndpointError::UnsupportedScheme(_)))
        ));
        assert!(matches!(
            config(&[("TIANDAO_USERNAME", "alice")]),
            Err(ConfigError::PartialCredentials)
        ));
    }
}
