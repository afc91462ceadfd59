//! Home Assistant WebSocket API message types.
//!
//! The API is a JSON message stream. After the auth handshake every command
//! carries an integer `id` that must increase within a connection; the server
//! answers with a `result` (or `pong`) frame echoing that id and pushes
//! subscription payloads as `event` frames.
//!
//! Protocol reference:
//! <https://developers.home-assistant.io/docs/api/websocket>

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::sync::oneshot;

use muthur_core::{EntityState, Error, Result, ServiceCall};

/// Event type carrying entity updates.
pub const STATE_CHANGED: &str = "state_changed";

// ---------------------------------------------------------------------------
// Outgoing commands
// ---------------------------------------------------------------------------

/// A command body without its `id`; the id is assigned when it is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct HassCommand {
    body: Map<String, Value>,
}

impl HassCommand {
    fn of_type(kind: &str) -> Self {
        let mut body = Map::new();
        body.insert("type".to_string(), Value::String(kind.to_string()));
        Self { body }
    }

    pub fn get_states() -> Self {
        Self::of_type("get_states")
    }

    pub fn get_config() -> Self {
        Self::of_type("get_config")
    }

    pub fn ping() -> Self {
        Self::of_type("ping")
    }

    pub fn subscribe_events(event_type: &str) -> Self {
        let mut cmd = Self::of_type("subscribe_events");
        cmd.body
            .insert("event_type".to_string(), Value::String(event_type.to_string()));
        cmd
    }

    pub fn call_service(call: &ServiceCall) -> Self {
        let mut cmd = Self::of_type("call_service");
        cmd.body
            .insert("domain".to_string(), Value::String(call.domain.clone()));
        cmd.body
            .insert("service".to_string(), Value::String(call.service.clone()));
        cmd.body.insert(
            "service_data".to_string(),
            Value::Object(call.service_data.clone()),
        );
        cmd
    }

    pub fn kind(&self) -> &str {
        self.body.get("type").and_then(Value::as_str).unwrap_or("")
    }

    /// Serialize with the given id.
    pub fn to_json(&self, id: u64) -> String {
        let mut body = self.body.clone();
        body.insert("id".to_string(), json!(id));
        Value::Object(body).to_string()
    }
}

/// The auth frame sent in reply to `auth_required`.
pub fn auth_message(access_token: &str) -> String {
    json!({ "type": "auth", "access_token": access_token }).to_string()
}

// ---------------------------------------------------------------------------
// Incoming messages
// ---------------------------------------------------------------------------

/// Error object of a failed `result` frame.
#[derive(Debug, Clone, Deserialize)]
pub struct HassError {
    pub code: String,
    pub message: String,
}

/// Response to a command (`result` or `pong`).
#[derive(Debug, Clone)]
pub struct HassResponse {
    pub id: u64,
    pub success: bool,
    pub result: Option<Value>,
    pub error: Option<HassError>,
}

impl HassResponse {
    /// Convert to the domain result.
    pub fn into_result(self) -> Result<Value> {
        if self.success {
            Ok(self.result.unwrap_or(Value::Null))
        } else {
            let err = self.error.unwrap_or(HassError {
                code: "unknown_error".to_string(),
                message: "request failed without an error body".to_string(),
            });
            Err(Error::service_rejected(err.code, err.message))
        }
    }
}

/// `data` of a `state_changed` event.
#[derive(Debug, Clone, Deserialize)]
pub struct StateChangedData {
    pub entity_id: String,
    #[serde(default)]
    pub new_state: Option<EntityState>,
}

/// A parsed frame from the server.
#[derive(Debug)]
pub enum HassMessage {
    AuthRequired { ha_version: Option<String> },
    AuthOk { ha_version: Option<String> },
    AuthInvalid { message: String },
    Response(HassResponse),
    /// An event pushed for a subscription.
    Event {
        subscription: u64,
        event_type: String,
        data: Value,
    },
    /// Anything we could not interpret.
    Unknown(String),
}

#[derive(Deserialize)]
struct RawFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<HassError>,
    #[serde(default)]
    event: Option<RawEvent>,
    #[serde(default)]
    ha_version: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(default)]
    event_type: String,
    #[serde(default)]
    data: Value,
}

/// Parse one WebSocket text frame.
///
/// The server may coalesce several messages into a JSON array; each element
/// is parsed on its own.
pub fn parse_messages(text: &str) -> Vec<HassMessage> {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => return vec![HassMessage::Unknown(text.to_string())],
    };

    match value {
        Value::Array(items) => items.into_iter().map(parse_value).collect(),
        other => vec![parse_value(other)],
    }
}

fn parse_value(value: Value) -> HassMessage {
    let raw_text = value.to_string();
    let frame: RawFrame = match serde_json::from_value(value) {
        Ok(f) => f,
        Err(_) => return HassMessage::Unknown(raw_text),
    };

    match frame.kind.as_str() {
        "auth_required" => HassMessage::AuthRequired {
            ha_version: frame.ha_version,
        },
        "auth_ok" => HassMessage::AuthOk {
            ha_version: frame.ha_version,
        },
        "auth_invalid" => HassMessage::AuthInvalid {
            message: frame
                .message
                .unwrap_or_else(|| "invalid access token".to_string()),
        },
        "result" => match frame.id {
            Some(id) => HassMessage::Response(HassResponse {
                id,
                success: frame.success.unwrap_or(false),
                result: frame.result,
                error: frame.error,
            }),
            None => HassMessage::Unknown(raw_text),
        },
        "pong" => match frame.id {
            Some(id) => HassMessage::Response(HassResponse {
                id,
                success: true,
                result: None,
                error: None,
            }),
            None => HassMessage::Unknown(raw_text),
        },
        "event" => match (frame.id, frame.event) {
            (Some(id), Some(event)) => HassMessage::Event {
                subscription: id,
                event_type: event.event_type,
                data: event.data,
            },
            _ => HassMessage::Unknown(raw_text),
        },
        _ => HassMessage::Unknown(raw_text),
    }
}

// ---------------------------------------------------------------------------
// Request tracker
// ---------------------------------------------------------------------------

/// Global monotonically-increasing counter for command ids.
///
/// Home Assistant rejects ids that do not increase within a connection, so
/// the counter is never reset, not even across reconnects.
static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate the next command id.
pub fn next_request_id() -> u64 {
    REQUEST_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

struct PendingRequest {
    response_tx: oneshot::Sender<HassResponse>,
    created_at: Instant,
}

/// Tracks in-flight commands and matches them to responses.
pub struct RequestTracker {
    pending: HashMap<u64, PendingRequest>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }

    /// Generate a fresh id and register a pending slot for it.
    pub fn register(&mut self) -> (u64, oneshot::Receiver<HassResponse>) {
        let id = next_request_id();
        let (tx, rx) = oneshot::channel();
        self.pending.insert(
            id,
            PendingRequest {
                response_tx: tx,
                created_at: Instant::now(),
            },
        );
        (id, rx)
    }

    /// Deliver a response to its waiting caller.
    ///
    /// Returns `false` if no request with that id is pending.
    pub fn complete(&mut self, response: HassResponse) -> bool {
        if let Some(pending) = self.pending.remove(&response.id) {
            let _ = pending.response_tx.send(response);
            true
        } else {
            false
        }
    }

    /// Drop every request older than `timeout`, returning their ids.
    pub fn cleanup_stale(&mut self, timeout: Duration) -> Vec<u64> {
        let now = Instant::now();
        let stale: Vec<u64> = self
            .pending
            .iter()
            .filter(|(_, req)| now.duration_since(req.created_at) > timeout)
            .map(|(id, _)| *id)
            .collect();

        for id in &stale {
            self.pending.remove(id);
        }
        stale
    }

    /// Drop every pending request; their callers see a closed channel.
    pub fn fail_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new()
    }
}
