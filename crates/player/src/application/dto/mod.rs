//! Application DTOs
//!
//! View models and validated inputs shared between services and the
//! presentation layer.

mod controls;
mod credentials;

pub use controls::{ControlsView, HistoryLine, StartButton};
pub use credentials::{CredentialError, Credentials, MIN_CREDENTIAL_LEN};
