//! Main TUI runner - entry point and event loop

use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{info, warn};

use muthur_app::config::{resolve_token, Dashboard};
use muthur_app::connection::spawn_connection;
use muthur_app::message::Message;
use muthur_app::process::process_message;
use muthur_app::signals;
use muthur_app::state::{AppState, ConnectionStatus};
use muthur_app::watcher::DashboardWatcher;
use muthur_app::{CardTimers, Endpoint};
use muthur_core::prelude::*;

use crate::{event, render, terminal};

/// What the dashboard runs with.
pub struct RunOptions {
    pub dashboard: Dashboard,
    /// File the dashboard came from; enables reloading and watching.
    pub config_path: Option<PathBuf>,
}

/// Run the dashboard until the user quits or a signal arrives
pub async fn run(options: RunOptions) -> Result<()> {
    let RunOptions {
        dashboard,
        config_path,
    } = options;

    // A bad URL is a config error; report it before taking over the terminal
    let endpoint = Endpoint::parse(&dashboard.connection.url)?;
    let token = resolve_token(&dashboard.connection);
    let watcher_settings = dashboard.watcher.clone();

    terminal::install_panic_hook();
    let mut term = ratatui::init();

    let mut state = AppState::new(dashboard, config_path.clone(), endpoint.base.clone());
    let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
    let mut timers = CardTimers::new();

    signals::spawn_signal_handler(msg_tx.clone());

    let connection = match token {
        Ok(token) => Some(spawn_connection(endpoint, token, msg_tx.clone())),
        Err(e) => {
            warn!("Not connecting: {}", e);
            process_message(
                &mut state,
                Message::ConnectionStatus(ConnectionStatus::Failed(e.to_string())),
                &msg_tx,
                &mut timers,
            );
            None
        }
    };

    let mut watcher = config_path.map(|path| DashboardWatcher::new(path, &watcher_settings));
    if let Some(watcher) = watcher.as_mut() {
        if let Err(e) = watcher.start(msg_tx.clone()) {
            warn!("Failed to start dashboard watcher: {}", e);
            state.error(format!("WATCHER OFFLINE: {e}"));
        }
    }

    timers.replace(state.attach_view(), &msg_tx);

    let result = run_loop(&mut term, &mut state, msg_rx, &msg_tx, &mut timers);

    timers.cancel_all();
    if let Some(watcher) = watcher.as_mut() {
        watcher.stop();
    }
    if let Some(host) = state.host.take() {
        host.disconnect().await;
    }
    if let Some(connection) = connection {
        connection.abort();
    }

    ratatui::restore();
    info!("MU/TH/UR session closed");

    result
}

/// Main event loop
fn run_loop(
    terminal: &mut ratatui::DefaultTerminal,
    state: &mut AppState,
    mut msg_rx: mpsc::Receiver<Message>,
    msg_tx: &mpsc::Sender<Message>,
    timers: &mut CardTimers,
) -> Result<()> {
    while !state.should_quit() {
        // Connection, timer, watcher and signal messages
        while let Ok(msg) = msg_rx.try_recv() {
            process_message(state, msg, msg_tx, timers);
        }

        terminal.draw(|frame| render::view(frame, state))?;

        if let Some(message) = event::poll()? {
            process_message(state, message, msg_tx, timers);
        }
    }

    Ok(())
}
