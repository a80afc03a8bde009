//! WebSocket Bridge - wires the session socket to the dispatcher and event bus.
//!
//! `create_connection` sets up:
//! - the `SessionClient` that owns the socket
//! - a dispatcher task draining the client's inbound channel
//! - a task forwarding connection state changes onto the event bus

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use tokio::sync::mpsc;

use crate::infrastructure::endpoint::Endpoints;
use crate::infrastructure::message_dispatcher::ProtocolDispatcher;
use crate::infrastructure::messaging::{ConnectionStateObserver, EventBus};
use crate::ports::outbound::PlayerEvent;

use super::client::SessionClient;

/// Result of creating a connection.
///
/// The socket is not opened until `client.connect()` is called.
pub struct Connection {
    pub client: SessionClient,
    pub state_observer: ConnectionStateObserver,
}

pub fn create_connection(
    endpoints: &Endpoints,
    jar: Arc<Jar>,
    reconnect_delay: Duration,
    dispatcher: ProtocolDispatcher,
    events: EventBus,
) -> Connection {
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let client = SessionClient::new(endpoints, jar, reconnect_delay, inbound_tx);

    tokio::spawn(dispatcher.run(inbound_rx));

    let state_observer = ConnectionStateObserver::new(client.subscribe_state());
    tokio::spawn(forward_connection_state(state_observer.clone(), events));

    Connection {
        client,
        state_observer,
    }
}

async fn forward_connection_state(mut observer: ConnectionStateObserver, events: EventBus) {
    while let Some(state) = observer.changed().await {
        tracing::debug!(%state, "Connection state changed");
        events.dispatch(PlayerEvent::ConnectionChanged(state)).await;
    }
}
