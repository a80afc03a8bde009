//! Session socket client using tokio-tungstenite
//!
//! A supervisor task owns the socket: it connects, pumps frames until the
//! socket closes, waits the fixed reconnection delay and tries again,
//! forever. `disconnect` retires the supervisor so the next `connect`
//! performs a fresh handshake with whatever the cookie jar holds then.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use reqwest::cookie::{CookieStore, Jar};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{header::COOKIE, HeaderValue};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use tiandao_shared::{ClientMessage, ServerMessage};

use crate::infrastructure::endpoint::Endpoints;
use crate::infrastructure::websocket::codec::{decode_frame, encode_client_message, Frame};
use crate::infrastructure::websocket::shared::ReconnectPolicy;
use crate::ports::outbound::{ConnectionError, ConnectionState, SessionConnectionPort};

type SessionStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const OUTBOUND_BUFFER: usize = 32;

/// Mutable link state, guarded by one lock so `Open` and the outbound
/// sender always change together.
#[derive(Default)]
struct Link {
    outbound: Option<mpsc::Sender<ClientMessage>>,
    waiters: Vec<oneshot::Sender<Result<(), ConnectionError>>>,
    supervisor: Option<JoinHandle<()>>,
}

struct Inner {
    ws_url: Url,
    cookie_url: Url,
    jar: Arc<Jar>,
    delay: Duration,
    state_tx: watch::Sender<ConnectionState>,
    link: Mutex<Link>,
    /// Bumped by `disconnect`; a supervisor only acts while its generation is current.
    generation: AtomicU64,
    inbound: mpsc::UnboundedSender<ServerMessage>,
}

/// WebSocket client for the session socket (Desktop)
#[derive(Clone)]
pub struct SessionClient {
    inner: Arc<Inner>,
}

impl SessionClient {
    /// Decoded inbound messages are pushed to `inbound` in arrival order.
    pub fn new(
        endpoints: &Endpoints,
        jar: Arc<Jar>,
        delay: Duration,
        inbound: mpsc::UnboundedSender<ServerMessage>,
    ) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            inner: Arc::new(Inner {
                ws_url: endpoints.websocket(),
                cookie_url: endpoints.websocket_cookie_url(),
                jar,
                delay,
                state_tx,
                link: Mutex::new(Link::default()),
                generation: AtomicU64::new(0),
                inbound,
            }),
        }
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state_tx.subscribe()
    }
}

#[async_trait]
impl SessionConnectionPort for SessionClient {
    fn state(&self) -> ConnectionState {
        *self.inner.state_tx.borrow()
    }

    async fn connect(&self) -> Result<(), ConnectionError> {
        let rx = {
            let mut link = self.inner.link.lock().await;
            if self.state().is_open() {
                return Ok(());
            }

            let (tx, rx) = oneshot::channel();
            link.waiters.push(tx);

            if link.supervisor.is_none() {
                let generation = self.inner.generation.load(Ordering::SeqCst);
                link.supervisor = Some(tokio::spawn(supervise(
                    Arc::clone(&self.inner),
                    generation,
                )));
            }
            rx
        };

        // The supervisor never drops a waiter without answering it.
        rx.await.unwrap_or(Err(ConnectionError::Disconnected))
    }

    async fn send_action(&self, action: &str) -> Result<(), ConnectionError> {
        let tx = {
            let link = self.inner.link.lock().await;
            link.outbound.clone()
        };
        let Some(tx) = tx else {
            tracing::warn!(action, "Dropping action, session socket is not open");
            return Err(ConnectionError::Disconnected);
        };

        tx.send(ClientMessage::action(action))
            .await
            .map_err(|_| ConnectionError::Disconnected)
    }

    async fn disconnect(&self) {
        let mut link = self.inner.link.lock().await;
        self.inner.generation.fetch_add(1, Ordering::SeqCst);

        if let Some(supervisor) = link.supervisor.take() {
            supervisor.abort();
        }
        // Dropping the last sender ends the writer, which closes the socket.
        link.outbound = None;
        for waiter in link.waiters.drain(..) {
            let _ = waiter.send(Err(ConnectionError::Disconnected));
        }
        self.inner.state_tx.send_replace(ConnectionState::Disconnected);
        tracing::info!(url = %self.inner.ws_url, "Session socket disconnected");
    }
}

async fn supervise(inner: Arc<Inner>, generation: u64) {
    let mut policy = ReconnectPolicy::fixed(inner.delay);

    loop {
        {
            let Some(_link) = inner.current(generation).await else {
                return;
            };
            inner.state_tx.send_replace(ConnectionState::Connecting);
        }

        match inner.open().await {
            Ok(stream) => {
                policy.reset();
                inner.run(stream, generation).await;
            }
            Err(err) => {
                tracing::warn!(url = %inner.ws_url, error = %err, "Session socket connection failed");
                inner.fail_waiters(err, generation).await;
            }
        }

        {
            let Some(mut link) = inner.current(generation).await else {
                return;
            };
            link.outbound = None;
            inner.state_tx.send_replace(ConnectionState::Reconnecting);
        }

        let delay = policy.next_delay_and_advance();
        tracing::info!(
            attempt = policy.attempts(),
            delay_ms = delay.as_millis() as u64,
            "Reconnecting to session socket"
        );
        tokio::time::sleep(delay).await;
    }
}

impl Inner {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Lock the link, or `None` once `disconnect` has retired this generation.
    async fn current(&self, generation: u64) -> Option<MutexGuard<'_, Link>> {
        let link = self.link.lock().await;
        self.is_current(generation).then_some(link)
    }

    async fn open(&self) -> Result<SessionStream, ConnectionError> {
        let mut request = self
            .ws_url
            .as_str()
            .into_client_request()
            .map_err(|e| ConnectionError::InvalidRequest(e.to_string()))?;

        if let Some(cookies) = self.jar.cookies(&self.cookie_url) {
            let value = HeaderValue::from_bytes(cookies.as_bytes())
                .map_err(|e| ConnectionError::InvalidRequest(e.to_string()))?;
            request.headers_mut().insert(COOKIE, value);
        }

        let (stream, _response) = connect_async(request)
            .await
            .map_err(|e| ConnectionError::Unreachable(e.to_string()))?;
        Ok(stream)
    }

    async fn fail_waiters(&self, err: ConnectionError, generation: u64) {
        let Some(mut link) = self.current(generation).await else {
            return;
        };
        for waiter in link.waiters.drain(..) {
            let _ = waiter.send(Err(err.clone()));
        }
    }

    /// Pump one established socket until it closes.
    async fn run(&self, stream: SessionStream, generation: u64) {
        let (mut write, mut read) = stream.split();
        let (tx, mut rx) = mpsc::channel::<ClientMessage>(OUTBOUND_BUFFER);

        {
            let Some(mut link) = self.current(generation).await else {
                return;
            };
            link.outbound = Some(tx);
            self.state_tx.send_replace(ConnectionState::Open);
            for waiter in link.waiters.drain(..) {
                let _ = waiter.send(Ok(()));
            }
        }
        tracing::info!(url = %self.ws_url, "Session socket open");

        let writer = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                let text = match encode_client_message(&msg) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::error!("Failed to serialize action: {}", e);
                        continue;
                    }
                };
                if let Err(e) = write.send(Message::Text(text)).await {
                    tracing::warn!("Failed to send action: {}", e);
                    return;
                }
            }
            let _ = write.close().await;
        });

        while let Some(msg) = read.next().await {
            let frame = match msg {
                Ok(Message::Text(text)) => Frame::Text(text),
                Ok(Message::Binary(bytes)) => Frame::Binary(bytes),
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed session socket");
                    break;
                }
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!("Session socket error: {}", e);
                    break;
                }
            };

            // Frames still in flight after a disconnect belong to the old session.
            if !self.is_current(generation) {
                break;
            }
            match decode_frame(&frame) {
                Ok(message) => {
                    if self.inbound.send(message).is_err() {
                        tracing::debug!("Inbound receiver dropped, discarding message");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Dropping undecodable frame"),
            }
        }

        writer.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Instant;

    use flate2::{write::GzEncoder, Compression};
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;
    use tokio_tungstenite::accept_hdr_async;
    use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

    use super::*;

    const FULL_STATE: &str = r#"{"type":"full_state","data":{"is_processing":false,"opportunities_remaining":10,"is_in_trial":false,"daily_success_achieved":false,"display_history":["hi"],"current_life":null}}"#;

    fn gzip(text: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).expect("write gzip");
        encoder.finish().expect("finish gzip")
    }

    async fn listener() -> (TcpListener, Endpoints) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        let endpoints = Endpoints::parse(&format!("http://127.0.0.1:{port}")).expect("endpoints");
        (listener, endpoints)
    }

    fn client(
        endpoints: &Endpoints,
        delay: Duration,
    ) -> (SessionClient, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = SessionClient::new(endpoints, Arc::new(Jar::default()), delay, tx);
        (client, rx)
    }

    #[tokio::test]
    async fn connect_resolves_once_open_and_is_idempotent() {
        let (listener, endpoints) = listener().await;
        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(tcp).await.expect("handshake");
            // Keep the socket alive until the client goes away.
            while ws.next().await.is_some() {}
        });

        let (client, _rx) = client(&endpoints, Duration::from_millis(50));
        assert_eq!(client.state(), ConnectionState::Disconnected);

        let (a, b) = tokio::join!(client.connect(), client.connect());
        assert_eq!(a, Ok(()));
        assert_eq!(b, Ok(()));
        assert_eq!(client.state(), ConnectionState::Open);

        // Already open: returns without a second handshake.
        assert_eq!(client.connect().await, Ok(()));
        server.abort();
    }

    #[tokio::test]
    async fn text_and_gzip_frames_reach_the_inbound_channel_in_order() {
        let (listener, endpoints) = listener().await;
        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(tcp).await.expect("handshake");
            ws.send(Message::Text(FULL_STATE.into())).await.expect("send text");
            ws.send(Message::Binary(vec![0x1f, 0x8b, 0xde, 0xad])).await.expect("send junk");
            ws.send(Message::Binary(gzip(FULL_STATE))).await.expect("send gzip");
            while ws.next().await.is_some() {}
        });

        let (client, mut rx) = client(&endpoints, Duration::from_millis(50));
        client.connect().await.expect("connect");

        let first = rx.recv().await.expect("first message");
        let second = rx.recv().await.expect("second message");
        assert!(matches!(first, ServerMessage::FullState { .. }));
        assert_eq!(first, second);
        // The corrupt frame was dropped without closing the socket.
        assert_eq!(client.state(), ConnectionState::Open);
        server.abort();
    }

    #[tokio::test]
    async fn send_action_writes_plain_json() {
        let (listener, endpoints) = listener().await;
        let (seen_tx, seen_rx) = oneshot::channel();
        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(tcp).await.expect("handshake");
            while let Some(Ok(msg)) = ws.next().await {
                if let Message::Text(text) = msg {
                    let _ = seen_tx.send(text);
                    break;
                }
            }
            while ws.next().await.is_some() {}
        });

        let (client, _rx) = client(&endpoints, Duration::from_millis(50));
        client.connect().await.expect("connect");
        client.send_action("探索").await.expect("send");

        assert_eq!(seen_rx.await.expect("server saw frame"), r#"{"action":"探索"}"#);
        server.abort();
    }

    #[tokio::test]
    async fn send_before_connect_is_dropped() {
        let (_listener, endpoints) = listener().await;
        let (client, _rx) = client(&endpoints, Duration::from_millis(50));

        assert_eq!(
            client.send_action("探索").await,
            Err(ConnectionError::Disconnected)
        );
    }

    #[tokio::test]
    async fn handshake_carries_the_session_cookie() {
        let (listener, endpoints) = listener().await;
        let (cookie_tx, cookie_rx) = oneshot::channel();
        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.expect("accept");
            let callback = |req: &Request, resp: Response| {
                let cookie = req
                    .headers()
                    .get(COOKIE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                let _ = cookie_tx.send((cookie, req.uri().to_string()));
                Ok::<_, ErrorResponse>(resp)
            };
            let mut ws = accept_hdr_async(tcp, callback).await.expect("handshake");
            while ws.next().await.is_some() {}
        });

        let jar = Arc::new(Jar::default());
        jar.add_cookie_str("token=abc123; Path=/", endpoints.origin());
        let (tx, _rx) = mpsc::unbounded_channel();
        let client = SessionClient::new(&endpoints, jar, Duration::from_millis(50), tx);
        client.connect().await.expect("connect");

        let (cookie, uri) = cookie_rx.await.expect("handshake seen");
        assert_eq!(cookie.as_deref(), Some("token=abc123"));
        assert_eq!(uri, "/api/ws");
        server.abort();
    }

    #[tokio::test]
    async fn unreachable_server_fails_waiters() {
        let (listener, endpoints) = listener().await;
        drop(listener);

        let (client, _rx) = client(&endpoints, Duration::from_secs(60));
        let result = client.connect().await;
        assert!(matches!(result, Err(ConnectionError::Unreachable(_))));
    }

    #[tokio::test]
    async fn lost_connection_retries_after_the_fixed_delay() {
        let delay = Duration::from_millis(200);
        let (listener, endpoints) = listener().await;
        let (closed_tx, closed_rx) = oneshot::channel();
        let (reopened_tx, reopened_rx) = oneshot::channel();
        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(tcp).await.expect("handshake");
            ws.close(None).await.expect("close");
            let _ = closed_tx.send(Instant::now());

            let (tcp, _) = listener.accept().await.expect("second accept");
            let mut ws = accept_async(tcp).await.expect("second handshake");
            let _ = reopened_tx.send(Instant::now());
            while ws.next().await.is_some() {}
        });

        let (client, _rx) = client(&endpoints, delay);
        let mut state = client.subscribe_state();
        client.connect().await.expect("connect");

        state
            .wait_for(|s| *s == ConnectionState::Reconnecting)
            .await
            .expect("state channel");

        let closed_at = closed_rx.await.expect("closed");
        let reopened_at = reopened_rx.await.expect("reopened");
        assert!(reopened_at.duration_since(closed_at) >= delay);

        state
            .wait_for(|s| *s == ConnectionState::Open)
            .await
            .expect("state channel");
        server.abort();
    }

    #[tokio::test]
    async fn disconnect_closes_the_socket_and_next_connect_rehandshakes() {
        let (listener, endpoints) = listener().await;
        let (cookies_tx, mut cookies_rx) = mpsc::unbounded_channel();
        let (closed_tx, closed_rx) = oneshot::channel();
        let server = tokio::spawn(async move {
            let mut closed_tx = Some(closed_tx);
            loop {
                let (tcp, _) = listener.accept().await.expect("accept");
                let seen = cookies_tx.clone();
                let callback = move |req: &Request, resp: Response| {
                    let cookie = req
                        .headers()
                        .get(COOKIE)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    let _ = seen.send(cookie);
                    Ok::<_, ErrorResponse>(resp)
                };
                let mut ws = accept_hdr_async(tcp, callback).await.expect("handshake");
                match closed_tx.take() {
                    Some(closed) => {
                        // First socket: wait for the client to hang up.
                        while let Some(Ok(msg)) = ws.next().await {
                            if msg.is_close() {
                                break;
                            }
                        }
                        let _ = closed.send(());
                    }
                    None => while ws.next().await.is_some() {},
                }
            }
        });

        let jar = Arc::new(Jar::default());
        jar.add_cookie_str("token=first; Path=/", endpoints.origin());
        let (tx, _rx) = mpsc::unbounded_channel();
        let client = SessionClient::new(&endpoints, Arc::clone(&jar), Duration::from_millis(50), tx);
        client.connect().await.expect("connect");
        assert_eq!(cookies_rx.recv().await.flatten().as_deref(), Some("token=first"));

        jar.add_cookie_str("token=second; Path=/", endpoints.origin());
        client.disconnect().await;
        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert_eq!(
            client.send_action("探索").await,
            Err(ConnectionError::Disconnected)
        );
        closed_rx.await.expect("old socket closed");

        client.connect().await.expect("reconnect");
        assert_eq!(cookies_rx.recv().await.flatten().as_deref(), Some("token=second"));
        assert_eq!(client.state(), ConnectionState::Open);
        server.abort();
    }
}
