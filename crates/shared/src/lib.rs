//! Tiandao Protocol - Shared types for the trial server and its clients
//!
//! This crate contains the types exchanged between the server and the player client:
//! - WebSocket message types (`ServerMessage`, `ClientMessage`)
//! - The authoritative session snapshot (`SessionState`)
//! - Transient roll notifications (`RollEvent`)
//! - HTTP response DTOs (`LoginToken`, `ErrorDetail`)
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and serde_json
//! 2. **No business logic** - Pure data types and serialization
//! 3. **Forward compatible** - unknown message kinds and fields are tolerated

pub mod messages;
pub mod responses;
pub mod session;

pub use messages::{ClientMessage, RollEvent, ServerMessage};
pub use responses::{ErrorDetail, LoginToken};
pub use session::{LifeAttributes, SessionState};

/// The action that begins a new trial attempt.
///
/// It is the only action allowed through while the server reports that it is
/// still processing a previous one.
pub const START_TRIAL_ACTION: &str = "开始试炼";
