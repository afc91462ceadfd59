//! Full-screen rendering tests

use serde_json::json;

use muthur_app::handler::update;
use muthur_app::message::{CardInput, Message};
use muthur_app::state::{AppPhase, AppState, CardId, StatusLevel, StatusLine};
use muthur_core::EntityState;

use super::view;
use crate::test_utils::{create_test_state, TestTerminal};

const DASHBOARD: &str = r#"
[connection]
url = "http://nostromo.local:8123"

[[views]]
title = "BRIDGE"
columns = 2

[[views.cards]]
type = "muthur-light-card"
entity = "light.galley"

[[views.cards]]
type = "muthur-sensor-card"
entity = "sensor.hull_temp"

[[views.cards]]
type = "muthur-alarm-card"
entity = "alarm_control_panel.nostromo"
title = "SECURITY"

[[views]]
title = "CARGO"
"#;

const ALARM: CardId = CardId { view: 0, index: 2 };

fn render_screen(state: &AppState) -> String {
    let mut term = TestTerminal::new();
    term.draw_with(|frame| view(frame, state));
    term.content()
}

fn with_entities() -> AppState {
    let mut state = create_test_state(DASHBOARD);
    state.entities.insert(
        EntityState::new("light.galley", "on")
            .with_attribute("friendly_name", "Galley Lights")
            .with_attribute("brightness", 255)
            .with_attribute("supported_color_modes", json!(["brightness"])),
    );
    state.entities.insert(
        EntityState::new("sensor.hull_temp", "21.5")
            .with_attribute("friendly_name", "Hull Temperature")
            .with_attribute("unit_of_measurement", "°C"),
    );
    state.entities.insert(EntityState::new(
        "alarm_control_panel.nostromo",
        "disarmed",
    ));
    state
}

#[test]
fn test_header_shows_title_and_view_tabs() {
    let state = create_test_state(DASHBOARD);
    let content = render_screen(&state);

    assert!(content.contains("MU/TH/UR 6000"));
    assert!(content.contains("BRIDGE"));
    assert!(content.contains("CARGO"));
    assert!(content.contains("ESTABLISHING LINK"));
}

#[test]
fn test_missing_entities_are_reported_per_card() {
    let state = create_test_state(DASHBOARD);
    let content = render_screen(&state);

    assert!(content.contains("ILLUMINATION CONTROL"));
    assert!(content.contains("Entity light.galley not found"));
    assert!(content.contains("Entity sensor.hull_temp not found"));
    assert!(content.contains("ALARM PANEL NOT AVAILABLE"));
}

#[test]
fn test_cards_render_entity_state() {
    let state = with_entities();
    let content = render_screen(&state);

    assert!(content.contains("Galley Lights"));
    assert!(content.contains("ACTIVE"));
    assert!(!content.contains("INACTIVE"));
    assert!(content.contains("BRIGHTNESS"));
    assert!(content.contains("100%"));

    assert!(content.contains("SENSOR DATA"));
    assert!(content.contains("21.5"));

    assert!(content.contains("SECURITY"));
    assert!(content.contains("DISARMED"));
    assert!(content.contains("[ARM AWAY]"));
    assert!(content.contains("ENTER CODE"));
}

#[test]
fn test_alarm_code_is_masked() {
    let mut state = with_entities();
    for digit in ['4', '2'] {
        update(
            &mut state,
            Message::CardInput {
                card: ALARM,
                input: CardInput::Digit(digit),
            },
        );
    }

    let content = render_screen(&state);
    assert!(content.contains("••"));
    assert!(!content.contains("42"));
}

#[test]
fn test_status_bar_shows_hints_then_errors() {
    let mut state = with_entities();
    let content = render_screen(&state);
    assert!(content.contains("toggle"));
    assert!(content.contains("quit"));

    state.status = Some(StatusLine {
        text: "CONNECTION TERMINATED".into(),
        level: StatusLevel::Error,
    });
    let content = render_screen(&state);
    assert!(content.contains("CONNECTION TERMINATED"));
    assert!(!content.contains("toggle"));
}

#[test]
fn test_confirm_quit_overlay() {
    let mut state = with_entities();
    state.phase = AppPhase::ConfirmQuit;

    let content = render_screen(&state);
    assert!(content.contains("TERMINATE SESSION"));
}

#[test]
fn test_detail_overlay_for_entity() {
    let mut state = with_entities();
    update(
        &mut state,
        Message::ShowDetail {
            entity_id: "sensor.hull_temp".into(),
        },
    );

    let content = render_screen(&state);
    assert!(content.contains("sensor.hull_temp"));
    assert!(content.contains("unit_of_measurement"));
}

#[test]
fn test_empty_view() {
    let mut state = with_entities();
    update(&mut state, Message::NextView);

    let content = render_screen(&state);
    assert!(content.contains("CARGO :: NO CARDS"));
}

#[test]
fn test_small_terminal_does_not_panic() {
    let state = with_entities();
    let mut term = TestTerminal::with_size(20, 6);
    term.draw_with(|frame| view(frame, &state));
}
