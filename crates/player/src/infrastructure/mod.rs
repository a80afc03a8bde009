pub mod endpoint;
pub mod http_client;
pub mod message_dispatcher;
pub mod messaging;
pub mod platform;
pub mod websocket;

pub use endpoint::{EndpointError, Endpoints};
pub use http_client::ApiAdapter;
pub use message_dispatcher::ProtocolDispatcher;
pub use messaging::{ConnectionStateObserver, EventBus};
