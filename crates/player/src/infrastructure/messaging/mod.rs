//! Messaging infrastructure between the socket and the presentation layer.
//!
//! - `EventBus`: push-based delivery of [`PlayerEvent`](crate::ports::outbound::PlayerEvent)s
//! - `ConnectionStateObserver`: read-only view of the socket lifecycle

pub mod connection;
pub mod event_bus;

pub use connection::ConnectionStateObserver;
pub use event_bus::EventBus;
