//! Action handlers: UpdateAction dispatch and background task spawning

use std::path::PathBuf;
use std::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use muthur_core::prelude::*;
use muthur_core::ServiceCall;

use crate::config::load_dashboard;
use crate::handler::UpdateAction;
use crate::host::ServiceCaller;
use crate::message::Message;
use crate::registry::CardRegistry;
use crate::state::{CardId, TimerSpec};

/// Running per-card timers. Dropping the set cancels them.
#[derive(Debug, Default)]
pub struct CardTimers {
    handles: Vec<(CardId, JoinHandle<()>)>,
}

impl CardTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every running timer and start `specs`.
    pub fn replace(&mut self, specs: Vec<TimerSpec>, msg_tx: &mpsc::Sender<Message>) {
        self.cancel_all();
        for spec in specs {
            debug!("Starting {:?} timer for card {}", spec.period, spec.card);
            let handle = spawn_card_timer(spec, msg_tx.clone());
            self.handles.push((spec.card, handle));
        }
    }

    pub fn cancel_all(&mut self) {
        for (card, handle) in self.handles.drain(..) {
            trace!("Cancelling timer for card {}", card);
            handle.abort();
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for CardTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

fn spawn_card_timer(spec: TimerSpec, msg_tx: mpsc::Sender<Message>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(spec.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            if msg_tx
                .send(Message::CardTimerFired { card: spec.card })
                .await
                .is_err()
            {
                break;
            }
        }
    })
}

/// Execute an action by spawning a background task
///
/// `caller` is the live connection, if any. Service calls made without one
/// complete immediately with an error.
pub fn handle_action<C>(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    caller: Option<C>,
    timers: &mut CardTimers,
) where
    C: ServiceCaller + Send + Sync + 'static,
{
    match action {
        UpdateAction::CallService { origin, call } => {
            tokio::spawn(execute_service_call(origin, call, caller, msg_tx));
        }

        UpdateAction::OpenUrl { url } => {
            tokio::spawn(async move {
                if let Err(e) = open_url_in_browser(&url) {
                    error!("Failed to open {}: {}", url, e);
                    let _ = msg_tx
                        .send(Message::OpenUrlFailed {
                            url,
                            error: e.to_string(),
                        })
                        .await;
                }
            });
        }

        UpdateAction::ReplaceTimers(specs) => {
            timers.replace(specs, &msg_tx);
        }

        UpdateAction::ScheduleMessage { delay, message } => {
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = msg_tx.send(*message).await;
            });
        }

        UpdateAction::ReloadDashboard { path } => {
            spawn_dashboard_reload(path, msg_tx);
        }
    }
}

async fn execute_service_call<C>(
    origin: CardId,
    call: ServiceCall,
    caller: Option<C>,
    msg_tx: mpsc::Sender<Message>,
) where
    C: ServiceCaller + Send + Sync + 'static,
{
    let service = call.qualified_name();
    let entity_id = call.entity_id().map(str::to_string);
    let result = match caller {
        Some(caller) => caller
            .call_service(call)
            .await
            .map_err(|e| e.to_string()),
        None => Err("not connected".to_string()),
    };

    let _ = msg_tx
        .send(Message::ServiceCallFinished {
            origin,
            service,
            entity_id,
            result,
        })
        .await;
}

fn spawn_dashboard_reload(path: PathBuf, msg_tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || {
            load_dashboard(&path, &CardRegistry::builtin()).map_err(|e| e.to_string())
        })
        .await
        .unwrap_or_else(|e| Err(format!("reload task failed: {e}")));

        let _ = msg_tx.send(Message::DashboardReloaded(result)).await;
    });
}

/// Open a URL in the system browser (fire-and-forget).
///
/// `$BROWSER` wins over the platform opener.
pub(crate) fn open_url_in_browser(url: &str) -> std::io::Result<()> {
    if let Some(browser) = std::env::var("BROWSER").ok().filter(|b| !b.is_empty()) {
        Command::new(browser).arg(url).spawn()?;
        return Ok(());
    }

    #[cfg(target_os = "macos")]
    {
        Command::new("open").arg(url).spawn()?;
        Ok(())
    }

    #[cfg(target_os = "linux")]
    {
        Command::new("xdg-open").arg(url).spawn()?;
        Ok(())
    }

    #[cfg(target_os = "windows")]
    {
        Command::new("cmd").args(["/C", "start", "", url]).spawn()?;
        Ok(())
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "no browser opener available for this platform",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::RecordingCaller;
    use serde_json::json;
    use std::time::Duration;

    fn disarm(code: &str) -> ServiceCall {
        ServiceCall::for_entity("alarm_control_panel.nostromo", "alarm_disarm").with("code", code)
    }

    #[tokio::test]
    async fn test_call_service_reports_success() {
        let (tx, mut rx) = mpsc::channel(8);
        let caller = RecordingCaller::default();
        let mut timers = CardTimers::new();

        handle_action(
            UpdateAction::CallService {
                origin: CardId::new(0, 2),
                call: disarm("1234"),
            },
            tx,
            Some(caller.clone()),
            &mut timers,
        );

        match rx.recv().await {
            Some(Message::ServiceCallFinished {
                origin,
                service,
                entity_id,
                result,
            }) => {
                assert_eq!(origin, CardId::new(0, 2));
                assert_eq!(service, "alarm_control_panel.alarm_disarm");
                assert_eq!(entity_id.as_deref(), Some("alarm_control_panel.nostromo"));
                assert!(result.is_ok());
            }
            other => panic!("Expected ServiceCallFinished, got {:?}", other),
        }
        assert_eq!(caller.recorded()[0].service_data.get("code"), Some(&json!("1234")));
    }

    #[tokio::test]
    async fn test_call_service_reports_rejection() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut timers = CardTimers::new();

        handle_action(
            UpdateAction::CallService {
                origin: CardId::new(0, 0),
                call: disarm("0000"),
            },
            tx,
            Some(RecordingCaller::rejecting("0000")),
            &mut timers,
        );

        assert!(matches!(
            rx.recv().await,
            Some(Message::ServiceCallFinished { result: Err(_), .. })
        ));
    }

    #[tokio::test]
    async fn test_call_service_without_connection() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut timers = CardTimers::new();

        handle_action::<RecordingCaller>(
            UpdateAction::CallService {
                origin: CardId::new(0, 0),
                call: disarm("1"),
            },
            tx,
            None,
            &mut timers,
        );

        match rx.recv().await {
            Some(Message::ServiceCallFinished { result, .. }) => {
                assert_eq!(result, Err("not connected".to_string()));
            }
            other => panic!("Expected ServiceCallFinished, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timers_fire_and_are_replaced() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut timers = CardTimers::new();
        let card = CardId::new(0, 1);

        handle_action::<RecordingCaller>(
            UpdateAction::ReplaceTimers(vec![TimerSpec {
                card,
                period: Duration::from_secs(1),
            }]),
            tx.clone(),
            None,
            &mut timers,
        );
        assert_eq!(timers.len(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(matches!(
            rx.recv().await,
            Some(Message::CardTimerFired { card: c }) if c == card
        ));

        handle_action::<RecordingCaller>(UpdateAction::ReplaceTimers(Vec::new()), tx, None, &mut timers);
        assert!(timers.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_message_after_delay() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut timers = CardTimers::new();
        let card = CardId::new(0, 0);

        handle_action::<RecordingCaller>(
            UpdateAction::ScheduleMessage {
                delay: Duration::from_millis(500),
                message: Box::new(Message::PictureRefreshDone { card }),
            },
            tx,
            None,
            &mut timers,
        );

        assert!(rx.try_recv().is_err());
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(matches!(
            rx.recv().await,
            Some(Message::PictureRefreshDone { .. })
        ));
    }

    #[tokio::test]
    async fn test_reload_reports_missing_file() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut timers = CardTimers::new();
        let dir = tempfile::tempdir().unwrap();

        handle_action::<RecordingCaller>(
            UpdateAction::ReloadDashboard {
                path: dir.path().join("missing.toml"),
            },
            tx,
            None,
            &mut timers,
        );

        assert!(matches!(
            rx.recv().await,
            Some(Message::DashboardReloaded(Err(_)))
        ));
    }
}
