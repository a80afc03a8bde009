//! Application services
//!
//! Services sit between the presentation layer and the outbound ports:
//! - `ActionService`: the action gate in front of the session socket
//! - `SessionService`: login, bootstrap, refresh and logout over HTTP
//! - `PreferencesService`: persisted UI chrome flags

pub mod action_service;
pub mod preferences_service;
pub mod session_service;

pub use action_service::{ActionService, SubmitOutcome};
pub use preferences_service::PreferencesService;
pub use session_service::{LoginError, SessionService};
