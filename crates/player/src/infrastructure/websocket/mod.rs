//! WebSocket client for the session socket
//!
//! - `codec`: frame decoding (text or gzip JSON) and action encoding
//! - `client`: tokio-tungstenite client with a fixed-delay reconnect loop
//! - `bridge`: wiring from the client to the dispatcher and event bus

mod bridge;
mod client;
pub mod codec;
mod shared;

pub use bridge::{create_connection, Connection};
pub use client::SessionClient;
pub use codec::{decode_frame, encode_client_message, CodecError, Frame};
pub use shared::{ReconnectPolicy, RECONNECT_DELAY_MS};
