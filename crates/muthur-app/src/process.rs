//! Message processing
//!
//! Runs a message and its follow-ups through the TEA update function and
//! hands every resulting action to [`handle_action`].

use tokio::sync::mpsc;

use crate::actions::{handle_action, CardTimers};
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    timers: &mut CardTimers,
) {
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx.clone(), state.host.clone(), timers);
        }

        msg = result.message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_dashboard;
    use crate::input_key::InputKey;
    use crate::registry::CardRegistry;
    use crate::state::ConnectionStatus;
    use muthur_core::EntityState;
    use url::Url;

    const DASHBOARD: &str = r#"
[connection]
url = "http://nostromo.local:8123"

[[views]]
[[views.cards]]
type = "muthur-alarm-card"
entity = "alarm_control_panel.nostromo"

[[views.cards]]
type = "muthur-clock-card"
"#;

    fn test_state() -> AppState {
        let dashboard = parse_dashboard(DASHBOARD, &CardRegistry::builtin()).unwrap();
        let mut state = AppState::new(
            dashboard,
            None,
            Url::parse("http://nostromo.local:8123").unwrap(),
        );
        state
            .entities
            .insert(EntityState::new("alarm_control_panel.nostromo", "armed_home"));
        state
    }

    #[tokio::test]
    async fn test_disarm_without_connection_round_trip() {
        let mut state = test_state();
        let mut timers = CardTimers::new();
        let (tx, mut rx) = mpsc::channel(8);
        state.attach_view();

        process_message(&mut state, Message::Key(InputKey::Char('4')), &tx, &mut timers);
        process_message(&mut state, Message::Key(InputKey::Enter), &tx, &mut timers);

        // No host: the call completes with an error, which the keypad shows
        let finished = rx.recv().await.unwrap();
        assert!(matches!(
            &finished,
            Message::ServiceCallFinished { result: Err(_), .. }
        ));
        process_message(&mut state, finished, &tx, &mut timers);

        match state.runtime(crate::state::CardId::new(0, 0)) {
            crate::state::CardRuntime::Alarm(keypad) => {
                assert_eq!(keypad.last_error(), Some(crate::cards::alarm::INVALID_CODE));
                assert_eq!(keypad.entered_code(), "");
            }
            other => panic!("Expected alarm runtime, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dashboard_reload_restarts_timers() {
        let mut state = test_state();
        let mut timers = CardTimers::new();
        let (tx, _rx) = mpsc::channel(8);

        let fresh = parse_dashboard(DASHBOARD, &CardRegistry::builtin()).unwrap();
        process_message(&mut state, Message::DashboardReloaded(Ok(fresh)), &tx, &mut timers);

        // One clock card, one timer
        assert_eq!(timers.len(), 1);
    }

    #[tokio::test]
    async fn test_connection_status_updates_state() {
        let mut state = test_state();
        let mut timers = CardTimers::new();
        let (tx, _rx) = mpsc::channel(8);

        process_message(
            &mut state,
            Message::ConnectionStatus(ConnectionStatus::Reconnecting {
                attempt: 2,
                max_attempts: 10,
            }),
            &tx,
            &mut timers,
        );
        assert!(state.status.as_ref().unwrap().text.contains("RETRY 2/10"));
    }
}
