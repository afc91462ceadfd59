//! Status card: health-coded entity list plus a status message.

use serde::Deserialize;
use serde_json::{json, Value};

use muthur_core::prelude::*;
use muthur_core::{parse_leading_float, EntitySnapshot, STATE_UNAVAILABLE, STATE_UNKNOWN};

use super::{default_true, non_empty, parse_config, require_field, CardKind, EntityRef};

pub const TYPE_ID: &str = "muthur-status-card";

const DEFAULT_TITLE: &str = "SYSTEM STATUS";
const DEFAULT_MESSAGE: &str = "ALL SYSTEMS OPERATIONAL";
pub const MESSAGE_HEADER: &str = "MU/TH/UR 6000 :: STATUS MESSAGE";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTheme {
    Yellow,
    Red,
    #[default]
    #[serde(other)]
    Green,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusConfig {
    pub entities: Vec<EntityRef>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "default_true")]
    pub show_message: bool,
    #[serde(default)]
    pub theme: StatusTheme,
}

/// Indicator colour of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Ok,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusRow {
    pub entity_id: String,
    pub label: String,
    pub value: String,
    pub health: Health,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusView {
    pub title: String,
    pub rows: Vec<StatusRow>,
    /// `None` when `show_message` is off.
    pub message: Option<String>,
    pub theme: StatusTheme,
}

pub fn validate(config: &Value) -> Result<()> {
    require_field(config, "entities", CardKind::Status, "You need to define entities")
}

pub fn parse(config: &Value) -> Result<StatusConfig> {
    validate(config)?;
    parse_config(CardKind::Status, config)
}

pub fn stub_config() -> Value {
    json!({
        "entities": [],
        "title": DEFAULT_TITLE,
        "message": DEFAULT_MESSAGE,
        "show_message": true,
        "theme": "green"
    })
}

/// `unavailable`/`unknown` are errors; `off`, `closed` and zero readings
/// are warnings; everything else is healthy.
pub fn entity_health(state: &str) -> Health {
    if state == STATE_UNAVAILABLE || state == STATE_UNKNOWN {
        Health::Error
    } else if state == "off" || state == "closed" || parse_leading_float(state) == Some(0.0) {
        Health::Warning
    } else {
        Health::Ok
    }
}

pub fn view(config: &StatusConfig, snapshot: &EntitySnapshot) -> StatusView {
    let rows = config
        .entities
        .iter()
        .map(|entry| {
            let resolved = entry.resolve();
            let state = resolved.lookup(snapshot);
            let label = resolved.label(state);
            match state {
                None => StatusRow {
                    entity_id: resolved.entity_id,
                    label,
                    value: "UNAVAILABLE".to_string(),
                    health: Health::Error,
                },
                Some(state) => StatusRow {
                    entity_id: resolved.entity_id,
                    label,
                    value: format!("{} {}", state.state, state.unit().unwrap_or(""))
                        .trim_end()
                        .to_string(),
                    health: entity_health(&state.state),
                },
            }
        })
        .collect();

    StatusView {
        title: non_empty(&config.title).unwrap_or(DEFAULT_TITLE).to_string(),
        rows,
        message: config
            .show_message
            .then(|| non_empty(&config.message).unwrap_or(DEFAULT_MESSAGE).to_string()),
        theme: config.theme,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muthur_core::EntityState;

    fn config(value: Value) -> StatusConfig {
        parse(&value).unwrap()
    }

    #[test]
    fn test_entities_required() {
        let err = validate(&json!({"title": "X"})).unwrap_err();
        assert!(err.to_string().contains("You need to define entities"));
        assert!(validate(&json!({"entities": []})).is_ok());
    }

    #[test]
    fn test_stub_is_valid() {
        let cfg = config(stub_config());
        assert!(cfg.entities.is_empty());
        assert_eq!(cfg.theme, StatusTheme::Green);
    }

    #[test]
    fn test_theme_parsing() {
        let red = config(json!({"entities": [], "theme": "red"}));
        assert_eq!(red.theme, StatusTheme::Red);

        let unknown = config(json!({"entities": [], "theme": "purple"}));
        assert_eq!(unknown.theme, StatusTheme::Green);
    }

    #[test]
    fn test_health_buckets() {
        assert_eq!(entity_health("unavailable"), Health::Error);
        assert_eq!(entity_health("unknown"), Health::Error);
        assert_eq!(entity_health("off"), Health::Warning);
        assert_eq!(entity_health("closed"), Health::Warning);
        assert_eq!(entity_health("0"), Health::Warning);
        assert_eq!(entity_health("0.0 kW"), Health::Warning);
        assert_eq!(entity_health("on"), Health::Ok);
        assert_eq!(entity_health("12"), Health::Ok);
        assert_eq!(entity_health("open"), Health::Ok);
    }

    #[test]
    fn test_view_rows() {
        let snapshot = EntitySnapshot::from_states([
            EntityState::new("sensor.reactor", "97")
                .with_attribute("unit_of_measurement", "%")
                .with_attribute("friendly_name", "Reactor"),
            EntityState::new("binary_sensor.hatch", "closed"),
        ]);
        let cfg = config(json!({
            "entities": [
                "sensor.reactor",
                {"entity": "binary_sensor.hatch", "name": "HATCH"},
                "sensor.missing"
            ],
            "theme": "red"
        }));

        let view = view(&cfg, &snapshot);
        assert_eq!(view.title, "SYSTEM STATUS");
        assert_eq!(view.theme, StatusTheme::Red);
        assert_eq!(view.message.as_deref(), Some("ALL SYSTEMS OPERATIONAL"));

        assert_eq!(view.rows[0].label, "Reactor");
        assert_eq!(view.rows[0].value, "97 %");
        assert_eq!(view.rows[0].health, Health::Ok);

        assert_eq!(view.rows[1].label, "HATCH");
        assert_eq!(view.rows[1].value, "closed");
        assert_eq!(view.rows[1].health, Health::Warning);

        assert_eq!(view.rows[2].label, "sensor.missing");
        assert_eq!(view.rows[2].value, "UNAVAILABLE");
        assert_eq!(view.rows[2].health, Health::Error);
    }

    #[test]
    fn test_message_hidden_and_empty_title_falls_back() {
        let cfg = config(json!({"entities": [], "show_message": false, "title": ""}));
        let view = view(&cfg, &EntitySnapshot::new());
        assert_eq!(view.message, None);
        assert_eq!(view.title, "SYSTEM STATUS");
    }

    #[test]
    fn test_unknown_theme_is_green() {
        let cfg = config(json!({"entities": [], "theme": "amber"}));
        assert_eq!(cfg.theme, StatusTheme::Green);
    }
}
