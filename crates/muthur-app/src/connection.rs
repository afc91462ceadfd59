//! Home Assistant connection task
//!
//! Connects once, then translates [`HassEvent`]s into [`Message`]s for the
//! event loop until the client gives up or the app stops listening.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use muthur_core::prelude::*;
use muthur_hass::{Endpoint, HassClient, HassEvent, HassHandle};

use crate::message::Message;
use crate::state::ConnectionStatus;

/// Spawn the connection task for `endpoint`.
pub fn spawn_connection(
    endpoint: Endpoint,
    token: String,
    msg_tx: mpsc::Sender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = run_connection(&endpoint, &token, &msg_tx).await {
            error!("Home Assistant connection failed: {}", e);
            let _ = msg_tx
                .send(Message::ConnectionStatus(ConnectionStatus::Failed(
                    e.to_string(),
                )))
                .await;
        }
    })
}

async fn run_connection(
    endpoint: &Endpoint,
    token: &str,
    msg_tx: &mpsc::Sender<Message>,
) -> Result<()> {
    send(msg_tx, Message::ConnectionStatus(ConnectionStatus::Connecting)).await?;

    let client = HassClient::connect(&endpoint.websocket, token).await?;
    let version = client.ha_version().map(str::to_string);
    let (handle, events) = client.into_parts();

    send(
        msg_tx,
        Message::HostConnected {
            handle: handle.clone(),
            version: version.clone(),
        },
    )
    .await?;
    load_host_state(&handle, msg_tx).await?;

    forward_events(&handle, version, events, msg_tx).await
}

/// Translate client events until the stream ends.
///
/// A failed state reload after a reconnect is not fatal; the client keeps
/// running and the next `Reconnected` retries it.
async fn forward_events(
    handle: &HassHandle,
    version: Option<String>,
    mut events: mpsc::Receiver<HassEvent>,
    msg_tx: &mpsc::Sender<Message>,
) -> Result<()> {
    while let Some(event) = events.recv().await {
        let message = match event {
            HassEvent::StateChanged {
                entity_id,
                new_state,
            } => Message::EntityChanged {
                entity_id,
                new_state,
            },
            HassEvent::Reconnecting {
                attempt,
                max_attempts,
            } => Message::ConnectionStatus(ConnectionStatus::Reconnecting {
                attempt,
                max_attempts,
            }),
            HassEvent::Reconnected => {
                info!("Reconnected to Home Assistant; refreshing state");
                send(
                    msg_tx,
                    Message::ConnectionStatus(ConnectionStatus::Connected {
                        version: version.clone(),
                    }),
                )
                .await?;
                if let Err(e) = load_host_state(handle, msg_tx).await {
                    if matches!(e, Error::ChannelSend { .. }) {
                        return Err(e);
                    }
                    warn!("State reload after reconnect failed: {}", e);
                }
                continue;
            }
            HassEvent::Disconnected => break,
        };
        send(msg_tx, message).await?;
    }

    info!("Home Assistant event stream closed");
    send(msg_tx, Message::ConnectionStatus(ConnectionStatus::Disconnected)).await
}

/// Fetch host configuration and the full entity state.
///
/// A failed config fetch is not fatal; the dashboard falls back to metric
/// defaults.
async fn load_host_state(handle: &HassHandle, msg_tx: &mpsc::Sender<Message>) -> Result<()> {
    match handle.get_config().await {
        Ok(config) => send(msg_tx, Message::HostConfigLoaded(config)).await?,
        Err(e) => warn!("Could not load host config: {}", e),
    }

    let states = handle.get_states().await?;
    send(msg_tx, Message::StatesLoaded(states)).await
}

async fn send(msg_tx: &mpsc::Sender<Message>, message: Message) -> Result<()> {
    msg_tx
        .send(message)
        .await
        .map_err(|_| Error::channel_send("dashboard message channel closed"))
}
