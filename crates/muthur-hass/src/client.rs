//! Async WebSocket client for the Home Assistant API.
//!
//! [`HassClient::connect`] opens the socket, authenticates with a long-lived
//! access token and hands the connection to a background task. The task owns
//! the socket: it writes commands coming from any [`HassHandle`], routes
//! `result` frames back to their callers and forwards `state_changed` events
//! on a bounded channel.
//!
//! ```text
//!   HassHandle::request() ──cmd──▶ ┌──────────────────────────────┐
//!                                  │ background task              │
//!                                  │  select! {                   │
//!                                  │    socket frame → tracker    │
//!   HassClient events ◀──event──── │                 → events     │
//!                                  │    command     → socket      │
//!                                  │    keepalive   → ping/cleanup│
//!                                  │  }                           │
//!                                  └──────────────────────────────┘
//! ```
//!
//! A lost connection is re-established with exponential backoff. Each new
//! session re-authenticates and re-subscribes to `state_changed`; consumers
//! receive [`HassEvent::Reconnected`] and should re-fetch the full state.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use muthur_core::prelude::*;
use muthur_core::{EntityState, HostConfig, ServiceCall};

use crate::protocol::{
    auth_message, parse_messages, HassCommand, HassMessage, RequestTracker, StateChangedData,
    STATE_CHANGED,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);
const MAX_RECONNECT_ATTEMPTS: u32 = 10;

const CMD_CHANNEL_CAPACITY: usize = 32;
const EVENT_CHANNEL_CAPACITY: usize = 512;

/// Time allowed for the whole auth handshake.
const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Keepalive ping and stale request cleanup period.
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// A pending request older than this is dropped.
const STALE_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Current connection state of a [`HassClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// Connection lost; the background task is retrying.
    Reconnecting { attempt: u32 },
}

/// Something the host pushed, or a change in the connection itself.
#[derive(Debug, Clone)]
pub enum HassEvent {
    /// An entity changed. `None` means the entity was removed.
    StateChanged {
        entity_id: String,
        new_state: Option<EntityState>,
    },
    Reconnecting { attempt: u32, max_attempts: u32 },
    /// A new session is up; previously fetched state may be stale.
    Reconnected,
    /// The background task gave up or was told to stop.
    Disconnected,
}

enum ClientCommand {
    SendRequest {
        command: HassCommand,
        response_tx: oneshot::Sender<Result<Value>>,
    },
    Disconnect,
}

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;

// ---------------------------------------------------------------------------
// HassHandle
// ---------------------------------------------------------------------------

/// A clonable handle for issuing commands over a shared connection.
///
/// Returns [`Error::ChannelClosed`] once the background task has exited.
#[derive(Clone)]
pub struct HassHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    state: Arc<RwLock<ConnectionState>>,
}

impl std::fmt::Debug for HassHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HassHandle")
            .field("connection_state", &self.connection_state())
            .finish()
    }
}

impl HassHandle {
    /// Send a command and wait for its `result`.
    ///
    /// # Errors
    ///
    /// - [`Error::ChannelClosed`] if the background task has exited or the
    ///   connection dropped before the answer arrived.
    /// - [`Error::ServiceRejected`] if Home Assistant answered `success: false`.
    pub async fn request(&self, command: HassCommand) -> Result<Value> {
        let (response_tx, response_rx) = oneshot::channel();

        self.cmd_tx
            .send(ClientCommand::SendRequest {
                command,
                response_tx,
            })
            .await
            .map_err(|_| Error::ChannelClosed)?;

        response_rx.await.map_err(|_| Error::ChannelClosed)?
    }

    /// Fetch every entity state.
    pub async fn get_states(&self) -> Result<Vec<EntityState>> {
        let result = self.request(HassCommand::get_states()).await?;
        serde_json::from_value(result)
            .map_err(|e| Error::protocol(format!("parse get_states response: {e}")))
    }

    /// Fetch host-wide configuration (units, location name, version).
    pub async fn get_config(&self) -> Result<HostConfig> {
        let result = self.request(HassCommand::get_config()).await?;
        serde_json::from_value(result)
            .map_err(|e| Error::protocol(format!("parse get_config response: {e}")))
    }

    pub async fn call_service(&self, call: &ServiceCall) -> Result<()> {
        debug!("Calling service {}", call);
        self.request(HassCommand::call_service(call)).await?;
        Ok(())
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_connected(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }

    /// Close the socket and stop the background task.
    pub async fn disconnect(&self) {
        let _ = self.cmd_tx.send(ClientCommand::Disconnect).await;
    }

    /// A handle whose background task never existed.
    ///
    /// Every request fails with [`Error::ChannelClosed`].
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn new_for_test() -> Self {
        let (cmd_tx, _cmd_rx) = mpsc::channel(1);
        Self {
            cmd_tx,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
        }
    }
}

// ---------------------------------------------------------------------------
// HassClient
// ---------------------------------------------------------------------------

/// Owner of a Home Assistant connection and its event stream.
pub struct HassClient {
    handle: HassHandle,
    event_rx: mpsc::Receiver<HassEvent>,
    ha_version: Option<String>,
}

impl HassClient {
    /// Connect and authenticate against `endpoint` (a `ws(s)://.../api/websocket` URL).
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`] if the socket cannot be opened or the
    ///   handshake times out.
    /// - [`Error::AuthFailed`] if the token is rejected.
    pub async fn connect(endpoint: &Url, access_token: &str) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ClientCommand>(CMD_CHANNEL_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel::<HassEvent>(EVENT_CHANNEL_CAPACITY);
        let state = Arc::new(RwLock::new(ConnectionState::Connecting));

        info!("Connecting to Home Assistant at {}", endpoint);
        let (ws_stream, ha_version) = open_session(endpoint, access_token).await?;
        info!(
            "Authenticated with Home Assistant {}",
            ha_version.as_deref().unwrap_or("(unknown version)")
        );

        set_state(&state, ConnectionState::Connected);

        tokio::spawn(run_client_task(
            endpoint.clone(),
            access_token.to_string(),
            ws_stream,
            cmd_rx,
            event_tx,
            Arc::clone(&state),
        ));

        Ok(Self {
            handle: HassHandle { cmd_tx, state },
            event_rx,
            ha_version,
        })
    }

    pub fn handle(&self) -> HassHandle {
        self.handle.clone()
    }

    pub fn event_receiver(&mut self) -> &mut mpsc::Receiver<HassEvent> {
        &mut self.event_rx
    }

    /// Split into the shared handle and the event stream.
    pub fn into_parts(self) -> (HassHandle, mpsc::Receiver<HassEvent>) {
        (self.handle, self.event_rx)
    }

    pub fn ha_version(&self) -> Option<&str> {
        self.ha_version.as_deref()
    }

    pub async fn get_states(&self) -> Result<Vec<EntityState>> {
        self.handle.get_states().await
    }

    pub async fn get_config(&self) -> Result<HostConfig> {
        self.handle.get_config().await
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.handle.connection_state()
    }

    /// Close the socket and stop the background task.
    pub async fn disconnect(&self) {
        self.handle.disconnect().await;
    }
}

// ---------------------------------------------------------------------------
// Session setup
// ---------------------------------------------------------------------------

/// Open the socket and run the auth handshake.
async fn open_session(endpoint: &Url, access_token: &str) -> Result<(WsStream, Option<String>)> {
    let (mut ws_stream, _response) = connect_async(endpoint.as_str())
        .await
        .map_err(|e| Error::connection(format!("Failed to connect to {endpoint}: {e}")))?;

    let ha_version = tokio::time::timeout(AUTH_TIMEOUT, authenticate(&mut ws_stream, access_token))
        .await
        .map_err(|_| Error::connection("Timed out waiting for Home Assistant authentication"))??;

    Ok((ws_stream, ha_version))
}

/// `auth_required` → `auth` → `auth_ok` | `auth_invalid`.
async fn authenticate(ws_stream: &mut WsStream, access_token: &str) -> Result<Option<String>> {
    match next_message(ws_stream).await? {
        HassMessage::AuthRequired { .. } => {}
        HassMessage::AuthOk { ha_version } => return Ok(ha_version),
        other => {
            return Err(Error::protocol(format!(
                "expected auth_required, got {other:?}"
            )))
        }
    }

    ws_stream
        .send(WsMessage::text(auth_message(access_token)))
        .await
        .map_err(|e| Error::connection(format!("Failed to send auth message: {e}")))?;

    match next_message(ws_stream).await? {
        HassMessage::AuthOk { ha_version } => Ok(ha_version),
        HassMessage::AuthInvalid { message } => Err(Error::auth_failed(message)),
        other => Err(Error::protocol(format!(
            "expected auth_ok or auth_invalid, got {other:?}"
        ))),
    }
}

/// Read frames until one parses into a message.
async fn next_message(ws_stream: &mut WsStream) -> Result<HassMessage> {
    loop {
        match ws_stream.next().await {
            Some(Ok(WsMessage::Text(text))) => {
                if let Some(message) = parse_messages(text.as_str()).into_iter().next() {
                    return Ok(message);
                }
            }
            Some(Ok(WsMessage::Close(_))) | None => {
                return Err(Error::connection("Connection closed during authentication"))
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                return Err(Error::connection(format!(
                    "WebSocket error during authentication: {e}"
                )))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Background task
// ---------------------------------------------------------------------------

async fn run_client_task(
    endpoint: Url,
    access_token: String,
    ws_stream: WsStream,
    mut cmd_rx: mpsc::Receiver<ClientCommand>,
    event_tx: mpsc::Sender<HassEvent>,
    state: Arc<RwLock<ConnectionState>>,
) {
    let mut tracker = RequestTracker::new();

    let mut reconnect = run_io_loop(ws_stream, &mut cmd_rx, &event_tx, &mut tracker).await;
    let mut attempt: u32 = 1;

    while reconnect {
        let dropped = tracker.fail_all();
        if dropped > 0 {
            debug!("Dropped {} pending request(s) after connection loss", dropped);
        }

        if attempt > MAX_RECONNECT_ATTEMPTS {
            error!(
                "Home Assistant: exceeded {} reconnection attempts, giving up",
                MAX_RECONNECT_ATTEMPTS
            );
            break;
        }

        set_state(&state, ConnectionState::Reconnecting { attempt });
        let _ = event_tx.try_send(HassEvent::Reconnecting {
            attempt,
            max_attempts: MAX_RECONNECT_ATTEMPTS,
        });

        let backoff = compute_backoff(attempt);
        warn!(
            "Home Assistant: connection lost, retrying in {:?} (attempt {}/{})",
            backoff, attempt, MAX_RECONNECT_ATTEMPTS
        );
        tokio::time::sleep(backoff).await;

        if cmd_rx.is_closed() {
            break;
        }

        match open_session(&endpoint, &access_token).await {
            Ok((ws_stream, _)) => {
                info!("Home Assistant: reconnected (attempt {})", attempt);
                set_state(&state, ConnectionState::Connected);
                let _ = event_tx.try_send(HassEvent::Reconnected);
                attempt = 1;
                reconnect = run_io_loop(ws_stream, &mut cmd_rx, &event_tx, &mut tracker).await;
            }
            Err(err) if err.is_fatal() => {
                error!("Home Assistant: reconnection refused: {}", err);
                break;
            }
            Err(err) => {
                warn!("Home Assistant: reconnection attempt {} failed: {}", attempt, err);
                attempt += 1;
            }
        }
    }

    set_state(&state, ConnectionState::Disconnected);
    let _ = event_tx.try_send(HassEvent::Disconnected);
    debug!("Home Assistant background task exiting");
}

/// Run one session's select loop.
///
/// Returns `true` if the connection was lost (reconnect), `false` on a
/// requested shutdown.
async fn run_io_loop(
    ws_stream: WsStream,
    cmd_rx: &mut mpsc::Receiver<ClientCommand>,
    event_tx: &mpsc::Sender<HassEvent>,
    tracker: &mut RequestTracker,
) -> bool {
    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    // A fresh session has no subscriptions.
    let (_, _subscription_rx) = send_untracked(
        &mut ws_sink,
        tracker,
        HassCommand::subscribe_events(STATE_CHANGED),
    )
    .await;

    let mut keepalive = tokio::time::interval(KEEPALIVE_INTERVAL);
    keepalive.tick().await;

    loop {
        tokio::select! {
            frame = ws_stream.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        handle_ws_text(text.as_str(), tracker, event_tx);
                    }
                    Some(Ok(WsMessage::Close(_))) => {
                        debug!("Home Assistant: received Close frame");
                        return true;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!("Home Assistant: WebSocket read error: {}", err);
                        return true;
                    }
                    None => {
                        debug!("Home Assistant: WebSocket stream ended");
                        return true;
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(ClientCommand::SendRequest { command, response_tx }) => {
                        if !handle_send_request(command, response_tx, tracker, &mut ws_sink).await {
                            return true;
                        }
                    }
                    Some(ClientCommand::Disconnect) => {
                        send_close(&mut ws_sink).await;
                        return false;
                    }
                    None => {
                        debug!("Home Assistant: command channel closed, shutting down");
                        send_close(&mut ws_sink).await;
                        return false;
                    }
                }
            }

            _ = keepalive.tick() => {
                let stale = tracker.cleanup_stale(STALE_REQUEST_TIMEOUT);
                if !stale.is_empty() {
                    debug!("Home Assistant: cleaned up {} stale request(s): {:?}", stale.len(), stale);
                }
                let (sent, _pong_rx) = send_untracked(&mut ws_sink, tracker, HassCommand::ping()).await;
                if !sent {
                    return true;
                }
            }
        }
    }
}

/// Compute exponential backoff for reconnection attempt `n`:
/// `INITIAL_BACKOFF * 2^(n-1)`, capped at `MAX_BACKOFF`.
fn compute_backoff(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1);
    let multiplier: u64 = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
    let secs = INITIAL_BACKOFF.as_secs().saturating_mul(multiplier);
    Duration::from_secs(secs.min(MAX_BACKOFF.as_secs()))
}

fn set_state(state: &RwLock<ConnectionState>, next: ConnectionState) {
    let mut guard = state.write().unwrap_or_else(|e| e.into_inner());
    *guard = next;
}

fn handle_ws_text(text: &str, tracker: &mut RequestTracker, event_tx: &mpsc::Sender<HassEvent>) {
    for message in parse_messages(text) {
        match message {
            HassMessage::Response(response) => {
                let id = response.id;
                if !tracker.complete(response) {
                    trace!("Home Assistant: response for untracked id {}", id);
                }
            }
            HassMessage::Event {
                event_type, data, ..
            } if event_type == STATE_CHANGED => {
                match serde_json::from_value::<StateChangedData>(data) {
                    Ok(changed) => {
                        let event = HassEvent::StateChanged {
                            entity_id: changed.entity_id,
                            new_state: changed.new_state,
                        };
                        if let Err(err) = event_tx.try_send(event) {
                            warn!("Home Assistant: event channel full or closed, dropping event: {}", err);
                        }
                    }
                    Err(err) => warn!("Home Assistant: malformed state_changed event: {}", err),
                }
            }
            HassMessage::Event { event_type, .. } => {
                trace!("Home Assistant: ignoring {} event", event_type);
            }
            HassMessage::Unknown(raw) => {
                debug!(
                    "Home Assistant: ignoring unknown message: {}",
                    raw.chars().take(120).collect::<String>()
                );
            }
            other => debug!("Home Assistant: unexpected message after auth: {:?}", other),
        }
    }
}

/// Write a command whose answer is forwarded to `response_tx`.
///
/// Returns `false` when the socket write failed.
async fn handle_send_request(
    command: HassCommand,
    response_tx: oneshot::Sender<Result<Value>>,
    tracker: &mut RequestTracker,
    ws_sink: &mut WsSink,
) -> bool {
    let (id, response_rx) = tracker.register();

    if let Err(err) = ws_sink.send(WsMessage::text(command.to_json(id))).await {
        let _ = response_tx.send(Err(Error::connection(format!(
            "Failed to send {} command: {err}",
            command.kind()
        ))));
        return false;
    }

    tokio::spawn(async move {
        let result = match response_rx.await {
            Ok(response) => response.into_result(),
            Err(_) => Err(Error::ChannelClosed),
        };
        let _ = response_tx.send(result);
    });

    true
}

/// Write a command nobody waits on. The tracker slot still routes the answer.
async fn send_untracked(
    ws_sink: &mut WsSink,
    tracker: &mut RequestTracker,
    command: HassCommand,
) -> (bool, oneshot::Receiver<crate::protocol::HassResponse>) {
    let (id, rx) = tracker.register();
    match ws_sink.send(WsMessage::text(command.to_json(id))).await {
        Ok(()) => (true, rx),
        Err(err) => {
            warn!("Home Assistant: failed to send {}: {}", command.kind(), err);
            (false, rx)
        }
    }
}

async fn send_close(ws_sink: &mut WsSink) {
    let _ = ws_sink.send(WsMessage::Close(None)).await;
    let _ = ws_sink.close().await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const TOKEN: &str = "weyland-yutani";

    /// A single-connection Home Assistant stand-in.
    ///
    /// Answers the auth handshake, `subscribe_events` (followed by one
    /// `state_changed` push), `get_states`, `get_config`, `ping` and
    /// `call_service`. Service calls carrying code `0000` are rejected.
    /// Returns every command it received.
    async fn spawn_fake_hass() -> (Url, JoinHandle<Vec<Value>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let url = Url::parse(&format!("ws://{addr}/api/websocket")).unwrap();

        let handle = tokio::spawn(async move {
            let mut received = Vec::new();
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

            ws.send(WsMessage::text(
                json!({"type": "auth_required", "ha_version": "2026.10.0"}).to_string(),
            ))
            .await
            .unwrap();

            let auth = read_json(&mut ws).await.unwrap();
            if auth["access_token"] != TOKEN {
                let reply = json!({"type": "auth_invalid", "message": "Invalid access token"});
                ws.send(WsMessage::text(reply.to_string())).await.unwrap();
                return received;
            }
            let reply = json!({"type": "auth_ok", "ha_version": "2026.10.0"});
            ws.send(WsMessage::text(reply.to_string())).await.unwrap();

            while let Some(cmd) = read_json(&mut ws).await {
                let id = cmd["id"].clone();
                let replies = match cmd["type"].as_str().unwrap_or_default() {
                    "subscribe_events" => vec![
                        json!({"id": id, "type": "result", "success": true, "result": null}),
                        json!({"id": id, "type": "event", "event": {
                            "event_type": "state_changed",
                            "data": {
                                "entity_id": "light.bridge",
                                "new_state": {"entity_id": "light.bridge", "state": "on", "attributes": {"brightness": 255}}
                            }
                        }}),
                    ],
                    "get_states" => vec![json!({"id": id, "type": "result", "success": true, "result": [
                        {"entity_id": "sensor.reactor", "state": "97", "attributes": {"unit_of_measurement": "%"}},
                        {"entity_id": "light.bridge", "state": "off", "attributes": {}}
                    ]})],
                    "get_config" => vec![json!({"id": id, "type": "result", "success": true, "result": {
                        "location_name": "Nostromo",
                        "version": "2026.10.0",
                        "unit_system": {"temperature": "°F"}
                    }})],
                    "ping" => vec![json!({"id": id, "type": "pong"})],
                    "call_service" if cmd["service_data"]["code"] == "0000" => vec![json!({
                        "id": id, "type": "result", "success": false,
                        "error": {"code": "home_assistant_error", "message": "Invalid alarm code"}
                    })],
                    "call_service" => {
                        vec![json!({"id": id, "type": "result", "success": true, "result": {"context": {}}})]
                    }
                    _ => vec![],
                };
                received.push(cmd);
                for reply in replies {
                    if ws.send(WsMessage::text(reply.to_string())).await.is_err() {
                        return received;
                    }
                }
            }
            received
        });

        (url, handle)
    }

    async fn read_json(
        ws: &mut WebSocketStream<tokio::net::TcpStream>,
    ) -> Option<Value> {
        loop {
            match ws.next().await? {
                Ok(WsMessage::Text(text)) => return serde_json::from_str(text.as_str()).ok(),
                Ok(WsMessage::Close(_)) | Err(_) => return None,
                Ok(_) => {}
            }
        }
    }

    // -- ConnectionState -----------------------------------------------------

    #[test]
    fn test_connection_state_eq() {
        assert_eq!(ConnectionState::Connected, ConnectionState::Connected);
        assert_ne!(ConnectionState::Connected, ConnectionState::Disconnected);
        assert_ne!(
            ConnectionState::Reconnecting { attempt: 1 },
            ConnectionState::Reconnecting { attempt: 2 }
        );
    }

    // -- compute_backoff -----------------------------------------------------

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(compute_backoff(1), Duration::from_secs(1));
        assert_eq!(compute_backoff(2), Duration::from_secs(2));
        assert_eq!(compute_backoff(3), Duration::from_secs(4));
        assert_eq!(compute_backoff(5), Duration::from_secs(16));
    }

    #[test]
    fn test_backoff_capped_at_max() {
        assert_eq!(compute_backoff(6), MAX_BACKOFF);
        assert_eq!(compute_backoff(64), MAX_BACKOFF);
        assert_eq!(compute_backoff(u32::MAX), MAX_BACKOFF);
    }

    // -- HassHandle ----------------------------------------------------------

    #[tokio::test]
    async fn test_handle_without_task_reports_channel_closed() {
        let handle = HassHandle::new_for_test();
        let err = handle.get_states().await.unwrap_err();
        assert!(matches!(err, Error::ChannelClosed));
        assert!(!handle.is_connected());
    }

    // -- Against the fake host -----------------------------------------------

    #[tokio::test]
    async fn test_connect_fetch_and_subscribe() {
        let (url, server) = spawn_fake_hass().await;
        let mut client = HassClient::connect(&url, TOKEN).await.unwrap();
        assert_eq!(client.ha_version(), Some("2026.10.0"));
        assert_eq!(client.connection_state(), ConnectionState::Connected);

        let event = tokio::time::timeout(Duration::from_secs(2), client.event_receiver().recv())
            .await
            .unwrap()
            .unwrap();
        match event {
            HassEvent::StateChanged {
                entity_id,
                new_state,
            } => {
                assert_eq!(entity_id, "light.bridge");
                assert_eq!(new_state.unwrap().attr_f64("brightness"), Some(255.0));
            }
            other => panic!("Expected StateChanged, got {:?}", other),
        }

        let states = client.get_states().await.unwrap();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].entity_id, "sensor.reactor");

        let config = client.get_config().await.unwrap();
        assert_eq!(config.location_name.as_deref(), Some("Nostromo"));
        assert_eq!(config.temperature_unit(), "°F");

        client.disconnect().await;
        let received = tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .unwrap()
            .unwrap();
        let kinds: Vec<&str> = received.iter().filter_map(|c| c["type"].as_str()).collect();
        assert_eq!(kinds, vec!["subscribe_events", "get_states", "get_config"]);
    }

    #[tokio::test]
    async fn test_call_service_success_and_rejection() {
        let (url, server) = spawn_fake_hass().await;
        let client = HassClient::connect(&url, TOKEN).await.unwrap();
        let handle = client.handle();

        let arm = ServiceCall::for_entity("alarm_control_panel.nostromo", "alarm_arm_away")
            .with("code", "2345");
        handle.call_service(&arm).await.unwrap();

        let disarm = ServiceCall::for_entity("alarm_control_panel.nostromo", "alarm_disarm")
            .with("code", "0000");
        let err = handle.call_service(&disarm).await.unwrap_err();
        assert!(matches!(err, Error::ServiceRejected { .. }));
        assert!(err.is_recoverable());

        client.disconnect().await;
        let received = tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .unwrap()
            .unwrap();
        let arm_cmd = received
            .iter()
            .find(|c| c["service"] == "alarm_arm_away")
            .unwrap();
        assert_eq!(arm_cmd["domain"], "alarm_control_panel");
        assert_eq!(arm_cmd["service_data"]["code"], "2345");
    }

    #[tokio::test]
    async fn test_command_ids_increase_within_session() {
        let (url, server) = spawn_fake_hass().await;
        let client = HassClient::connect(&url, TOKEN).await.unwrap();
        client.get_states().await.unwrap();
        client.get_config().await.unwrap();
        client.disconnect().await;

        let received = tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .unwrap()
            .unwrap();
        let ids: Vec<u64> = received.iter().filter_map(|c| c["id"].as_u64()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids: {:?}", ids);
    }

    #[tokio::test]
    async fn test_invalid_token_is_fatal() {
        let (url, _server) = spawn_fake_hass().await;
        let err = HassClient::connect(&url, "wrong").await.err().unwrap();
        assert!(matches!(err, Error::AuthFailed { .. }));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("ws://{addr}/api/websocket")).unwrap();
        let err = HassClient::connect(&url, TOKEN).await.err().unwrap();
        assert!(matches!(err, Error::Connection { .. }));
    }
}
