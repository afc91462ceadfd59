//! Connection and entity-state handlers

use chrono::Utc;

use muthur_core::prelude::*;
use muthur_core::{EntitySnapshot, EntityState, HostConfig};
use muthur_hass::HassHandle;

use crate::cards::Card;
use crate::state::{AppState, CardRuntime, ConnectionStatus};

use super::UpdateResult;

pub fn handle_host_connected(
    state: &mut AppState,
    handle: HassHandle,
    version: Option<String>,
) -> UpdateResult {
    info!("Connected to Home Assistant {}", version.as_deref().unwrap_or("(unknown version)"));
    state.host = Some(handle);
    state.connection = ConnectionStatus::Connected { version };
    UpdateResult::none()
}

pub fn handle_host_config(state: &mut AppState, config: HostConfig) -> UpdateResult {
    debug!(
        "Host config: location={:?}, temperature unit {}",
        config.location_name,
        config.temperature_unit()
    );
    state.host_config = config;
    UpdateResult::none()
}

/// Replace the whole snapshot and rebuild what depends on it.
pub fn handle_states_loaded(state: &mut AppState, states: Vec<EntityState>) -> UpdateResult {
    debug!("Loaded {} entities", states.len());
    state.entities = EntitySnapshot::from_states(states);
    refresh_pictures(state, None);
    UpdateResult::none()
}

pub fn handle_entity_changed(
    state: &mut AppState,
    entity_id: String,
    new_state: Option<EntityState>,
) -> UpdateResult {
    trace!("state_changed {}", entity_id);
    state.entities.apply(&entity_id, new_state);
    refresh_pictures(state, Some(&entity_id));
    UpdateResult::none()
}

pub fn handle_connection_status(state: &mut AppState, status: ConnectionStatus) -> UpdateResult {
    match &status {
        ConnectionStatus::Reconnecting {
            attempt,
            max_attempts,
        } => state.error(format!("CONNECTION LOST - RETRY {attempt}/{max_attempts}")),
        ConnectionStatus::Disconnected => {
            state.host = None;
            state.error("CONNECTION TERMINATED");
        }
        ConnectionStatus::Failed(message) => {
            state.host = None;
            state.error(format!("CONNECTION FAILED: {message}"));
        }
        ConnectionStatus::Connected { .. } => state.status = None,
        ConnectionStatus::Connecting | ConnectionStatus::Offline => {}
    }
    state.connection = status;
    UpdateResult::none()
}

/// Let picture feeds pick up a changed `entity_picture`. With `changed`
/// set, only feeds for that entity are checked.
fn refresh_pictures(state: &mut AppState, changed: Option<&str>) {
    let now = Utc::now();
    let view_index = state.current_view;
    let Some(view) = state.dashboard.views.get(view_index) else {
        return;
    };

    for (index, card) in view.cards.iter().enumerate() {
        let Card::Picture(config) = card else {
            continue;
        };
        if changed.is_some_and(|id| config.entity.as_deref() != Some(id)) {
            continue;
        }
        let id = crate::state::CardId::new(view_index, index);
        if let Some(CardRuntime::Picture(feed)) = state.runtime.get_mut(&id) {
            feed.on_entity_changed(config, &state.entities, &state.media_base, now);
        }
    }
}
