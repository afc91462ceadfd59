//! Dashboard file watcher
//!
//! Watches the directory holding `dashboard.toml` (editors often replace the
//! file rather than write it in place) and reports debounced changes to that
//! one file as [`Message::ConfigFileChanged`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, DebounceEventResult};
use tokio::sync::{mpsc, oneshot};

use muthur_core::prelude::*;

use crate::config::WatcherSettings;
use crate::message::Message;

/// How often the blocking watcher thread checks for a stop request.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Watches one dashboard file.
pub struct DashboardWatcher {
    path: PathBuf,
    debounce: Duration,
    stop_tx: Option<oneshot::Sender<()>>,
}

impl DashboardWatcher {
    pub fn new(path: PathBuf, settings: &WatcherSettings) -> Self {
        Self {
            path,
            debounce: Duration::from_millis(settings.debounce_ms),
            stop_tx: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Start watching. Changes arrive on `message_tx`.
    pub fn start(&mut self, message_tx: mpsc::Sender<Message>) -> Result<()> {
        if self.is_running() {
            return Err(Error::config("dashboard watcher is already running"));
        }

        let path = self.path.clone();
        let debounce = self.debounce;
        let (stop_tx, stop_rx) = oneshot::channel();
        self.stop_tx = Some(stop_tx);

        tokio::task::spawn_blocking(move || {
            run_watcher(path, debounce, message_tx, stop_rx);
        });

        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some()
    }
}

impl Drop for DashboardWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Whether any of `paths` is the watched file.
fn touches(paths: &[PathBuf], target: &Path) -> bool {
    let name = target.file_name();
    paths.iter().any(|p| p == target || (name.is_some() && p.file_name() == name))
}

fn run_watcher(
    path: PathBuf,
    debounce: Duration,
    message_tx: mpsc::Sender<Message>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let Some(dir) = path.parent().map(Path::to_path_buf) else {
        warn!("Dashboard path {} has no parent directory", path.display());
        return;
    };
    let dir = if dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        dir
    };

    let target = path.clone();
    let tx = message_tx.clone();
    let debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| match result {
        Ok(events) => {
            let relevant = events.iter().filter(|e| touches(&e.paths, &target)).count();
            if relevant > 0 {
                debug!("Dashboard file changed ({} event(s))", relevant);
                let _ = tx.blocking_send(Message::ConfigFileChanged);
            }
        }
        Err(errors) => {
            for error in errors {
                warn!("Dashboard watcher error: {:?}", error);
            }
        }
    });

    let mut debouncer = match debouncer {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to create dashboard watcher: {}", e);
            return;
        }
    };

    if let Err(e) = debouncer.watch(&dir, RecursiveMode::NonRecursive) {
        warn!("Failed to watch {}: {}", dir.display(), e);
        return;
    }
    info!("Watching dashboard file {}", path.display());

    loop {
        match stop_rx.try_recv() {
            Ok(()) | Err(oneshot::error::TryRecvError::Closed) => {
                info!("Dashboard watcher stopping");
                break;
            }
            Err(oneshot::error::TryRecvError::Empty) => std::thread::sleep(STOP_POLL_INTERVAL),
        }
    }
}
