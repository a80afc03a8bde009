//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to interact with external systems without
//! depending on concrete implementations.

pub mod api_port;
pub mod platform;
pub mod player_events;
pub mod session_connection_port;

pub use api_port::{ApiError, SessionApiPort};
pub use platform::{storage_keys, StorageProvider};
pub use player_events::{Notice, OverlayPhase, PlayerEvent, RollOverlayView, SessionView};
pub use session_connection_port::{ConnectionError, ConnectionState, SessionConnectionPort};
