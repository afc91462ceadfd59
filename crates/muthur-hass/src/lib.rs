//! # muthur-hass - Home Assistant Connection
//!
//! WebSocket client for the Home Assistant API: auth handshake, command/result
//! correlation, `state_changed` subscription and service calls, with
//! automatic reconnection.
//!
//! ## Public API
//!
//! - [`Endpoint`] - Normalises a configured URL into WebSocket and HTTP bases
//! - [`HassClient`] - Owns the connection and the event stream
//! - [`HassHandle`] - Clonable command handle (`get_states`, `call_service`, ...)
//! - [`HassEvent`] - Entity changes and connection lifecycle events

pub mod client;
pub mod endpoint;
pub mod protocol;

pub use client::{ConnectionState, HassClient, HassEvent, HassHandle};
pub use endpoint::{resolve_media_url, Endpoint};
pub use protocol::HassCommand;
