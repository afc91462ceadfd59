//! Main update function - handles state transitions (TEA pattern)

use muthur_core::prelude::*;

use crate::message::Message;
use crate::state::AppState;

use super::{cards, host, keys::handle_key, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::RequestQuit => {
            state.request_quit();
            UpdateResult::none()
        }

        Message::Quit => {
            state.force_quit();
            UpdateResult::none()
        }

        Message::ConfirmQuit => {
            state.confirm_quit();
            UpdateResult::none()
        }

        Message::CancelQuit => {
            state.cancel_quit();
            UpdateResult::none()
        }

        Message::Key(key) => match handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Tick => {
            state.tick = state.tick.wrapping_add(1);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Host Connection
        // ─────────────────────────────────────────────────────────
        Message::HostConnected { handle, version } => {
            host::handle_host_connected(state, handle, version)
        }
        Message::HostConfigLoaded(config) => host::handle_host_config(state, config),
        Message::StatesLoaded(states) => host::handle_states_loaded(state, states),
        Message::EntityChanged {
            entity_id,
            new_state,
        } => host::handle_entity_changed(state, entity_id, new_state),
        Message::ConnectionStatus(status) => host::handle_connection_status(state, status),

        // ─────────────────────────────────────────────────────────
        // Cards
        // ─────────────────────────────────────────────────────────
        Message::CardInput { card, input } => cards::handle_card_input(state, card, input),
        Message::CardTimerFired { card } => cards::handle_timer_fired(state, card),
        Message::PictureRefreshDone { card } => cards::handle_picture_refresh_done(state, card),
        Message::ServiceCallFinished {
            origin,
            service,
            entity_id,
            result,
        } => cards::handle_service_call_finished(
            state,
            origin,
            &service,
            entity_id.as_deref(),
            result,
        ),

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::NextView => {
            let count = state.view_count();
            if count <= 1 {
                return UpdateResult::none();
            }
            let next = (state.current_view + 1) % count;
            UpdateResult::action(UpdateAction::ReplaceTimers(state.select_view(next)))
        }

        Message::PrevView => {
            let count = state.view_count();
            if count <= 1 {
                return UpdateResult::none();
            }
            let prev = (state.current_view + count - 1) % count;
            UpdateResult::action(UpdateAction::ReplaceTimers(state.select_view(prev)))
        }

        Message::FocusNext => {
            state.focus_next();
            UpdateResult::none()
        }

        Message::FocusPrev => {
            state.focus_prev();
            UpdateResult::none()
        }

        Message::Navigate { path } => match state.dashboard.find_view(&path) {
            Some(index) if index == state.current_view => UpdateResult::none(),
            Some(index) => {
                info!("Navigating to {} (view {})", path, index);
                UpdateResult::action(UpdateAction::ReplaceTimers(state.select_view(index)))
            }
            None => {
                state.error(format!("NO VIEW AT {path}"));
                UpdateResult::none()
            }
        },

        Message::ShowDetail { entity_id } => {
            state.detail = Some(entity_id);
            UpdateResult::none()
        }

        Message::CloseDetail => {
            state.detail = None;
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Dashboard Config
        // ─────────────────────────────────────────────────────────
        Message::ConfigFileChanged => {
            if state.dashboard.watcher.auto_reload {
                UpdateResult::message(Message::ReloadDashboard)
            } else {
                debug!("Dashboard file changed; auto reload disabled");
                UpdateResult::none()
            }
        }

        Message::ReloadDashboard => match state.config_path.clone() {
            Some(path) => {
                state.notice("RELOADING DASHBOARD");
                UpdateResult::action(UpdateAction::ReloadDashboard { path })
            }
            None => UpdateResult::none(),
        },

        Message::DashboardReloaded(Ok(dashboard)) => {
            info!("Dashboard reloaded: {} views", dashboard.views.len());
            state.notice("DASHBOARD RELOADED");
            UpdateResult::action(UpdateAction::ReplaceTimers(
                state.replace_dashboard(dashboard),
            ))
        }

        Message::DashboardReloaded(Err(e)) => {
            warn!("Dashboard reload failed: {}", e);
            state.error(format!("RELOAD FAILED: {e}"));
            UpdateResult::none()
        }

        Message::OpenUrlFailed { url, error } => {
            state.error(format!("CANNOT OPEN {url}: {error}"));
            UpdateResult::none()
        }
    }
}
