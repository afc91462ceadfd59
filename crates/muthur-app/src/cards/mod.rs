//! Card configurations, validators and view models
//!
//! Every card module follows the same shape:
//! - `XConfig`: the typed configuration, deserialized after validation
//! - `validate(&Value)`: the required-field check run when a config is set
//! - `stub_config()`: a minimal starting configuration
//! - `view(...)`: a pure function from config and entity snapshot to the
//!   values the TUI draws
//!
//! The [`Card`] enum ties them together; [`crate::registry`] exposes them by
//! type id.

pub mod alarm;
pub mod button;
pub mod clock;
pub mod entity_ref;
pub mod gauge;
pub mod glance;
pub mod light;
pub mod picture;
pub mod sensor;
pub mod status;
pub mod tap_action;
pub mod text;
pub mod weather;

use serde::de::DeserializeOwned;
use serde_json::Value;

use muthur_core::prelude::*;

pub use entity_ref::{EntityRef, ResolvedEntity};
pub use tap_action::TapAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKind {
    Status,
    Sensor,
    Button,
    Text,
    Gauge,
    Clock,
    Glance,
    Light,
    Picture,
    Weather,
    Alarm,
}

impl CardKind {
    /// Registration order.
    pub const ALL: [CardKind; 11] = [
        CardKind::Status,
        CardKind::Sensor,
        CardKind::Button,
        CardKind::Text,
        CardKind::Gauge,
        CardKind::Clock,
        CardKind::Glance,
        CardKind::Light,
        CardKind::Picture,
        CardKind::Weather,
        CardKind::Alarm,
    ];

    pub fn type_id(self) -> &'static str {
        match self {
            CardKind::Status => status::TYPE_ID,
            CardKind::Sensor => sensor::TYPE_ID,
            CardKind::Button => button::TYPE_ID,
            CardKind::Text => text::TYPE_ID,
            CardKind::Gauge => gauge::TYPE_ID,
            CardKind::Clock => clock::TYPE_ID,
            CardKind::Glance => glance::TYPE_ID,
            CardKind::Light => light::TYPE_ID,
            CardKind::Picture => picture::TYPE_ID,
            CardKind::Weather => weather::TYPE_ID,
            CardKind::Alarm => alarm::TYPE_ID,
        }
    }

    pub fn from_type_id(type_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_id() == type_id)
    }
}

impl std::fmt::Display for CardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_id())
    }
}

/// A validated, typed card configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Card {
    Status(status::StatusConfig),
    Sensor(sensor::SensorConfig),
    Button(button::ButtonConfig),
    Text(text::TextConfig),
    Gauge(gauge::GaugeConfig),
    Clock(clock::ClockConfig),
    Glance(glance::GlanceConfig),
    Light(light::LightConfig),
    Picture(picture::PictureConfig),
    Weather(weather::WeatherConfig),
    Alarm(alarm::AlarmConfig),
}

impl Card {
    pub fn kind(&self) -> CardKind {
        match self {
            Card::Status(_) => CardKind::Status,
            Card::Sensor(_) => CardKind::Sensor,
            Card::Button(_) => CardKind::Button,
            Card::Text(_) => CardKind::Text,
            Card::Gauge(_) => CardKind::Gauge,
            Card::Clock(_) => CardKind::Clock,
            Card::Glance(_) => CardKind::Glance,
            Card::Light(_) => CardKind::Light,
            Card::Picture(_) => CardKind::Picture,
            Card::Weather(_) => CardKind::Weather,
            Card::Alarm(_) => CardKind::Alarm,
        }
    }

    pub fn type_id(&self) -> &'static str {
        self.kind().type_id()
    }

    /// The single entity a card is about, if it has one.
    pub fn primary_entity(&self) -> Option<&str> {
        let entity = match self {
            Card::Sensor(c) => Some(c.entity.as_str()),
            Card::Gauge(c) => Some(c.entity.as_str()),
            Card::Light(c) => Some(c.entity.as_str()),
            Card::Weather(c) => Some(c.entity.as_str()),
            Card::Alarm(c) => Some(c.entity.as_str()),
            Card::Picture(c) => c.entity.as_deref(),
            Card::Text(c) => c.entity.as_deref(),
            Card::Status(_) | Card::Button(_) | Card::Clock(_) | Card::Glance(_) => None,
        };
        entity.filter(|e| !e.is_empty())
    }

    /// Number of selectable items inside the card (buttons, glance cells,
    /// status rows).
    pub fn item_count(&self) -> usize {
        match self {
            Card::Button(c) => c.buttons.len(),
            Card::Glance(c) => c.entities.len(),
            Card::Status(c) => c.entities.len(),
            _ => 0,
        }
    }
}

// ─────────────────────────────────────────────────────────
// Validation helpers
// ─────────────────────────────────────────────────────────

/// Loose truthiness used by the required-field checks: absent, `null`,
/// `false`, `0` and `""` are all missing.
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

pub(crate) fn require_field(
    config: &Value,
    field: &str,
    kind: CardKind,
    message: &str,
) -> Result<()> {
    if is_truthy(config.get(field)) {
        Ok(())
    } else {
        Err(Error::missing_field(kind.type_id(), message))
    }
}

pub(crate) fn require_array(
    config: &Value,
    field: &str,
    kind: CardKind,
    message: &str,
) -> Result<()> {
    match config.get(field) {
        Some(Value::Array(_)) => Ok(()),
        _ => Err(Error::missing_field(kind.type_id(), message)),
    }
}

/// Deserialize a validated config, naming the card type on failure.
pub(crate) fn parse_config<T: DeserializeOwned>(kind: CardKind, config: &Value) -> Result<T> {
    serde_json::from_value(config.clone())
        .map_err(|e| Error::config_invalid(format!("{}: {}", kind.type_id(), e)))
}

/// `Some(s)` unless the option is empty or holds an empty string.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_id_round_trip_for_every_kind() {
        for kind in CardKind::ALL {
            assert_eq!(CardKind::from_type_id(kind.type_id()), Some(kind));
            assert!(kind.type_id().starts_with("muthur-"));
            assert!(kind.type_id().ends_with("-card"));
        }
        assert_eq!(CardKind::from_type_id("entities"), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(is_truthy(Some(&json!([]))));
        assert!(is_truthy(Some(&json!({}))));
        assert!(is_truthy(Some(&json!("sensor.x"))));
        assert!(is_truthy(Some(&json!(3))));
    }

    #[test]
    fn test_require_field_reports_card_type() {
        let err = require_field(
            &json!({"type": "muthur-sensor-card"}),
            "entity",
            CardKind::Sensor,
            "You need to define an entity",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "muthur-sensor-card: You need to define an entity");
    }

    #[test]
    fn test_require_array_rejects_other_shapes() {
        let msg = "You need to define buttons as an array";
        assert!(require_array(&json!({"buttons": []}), "buttons", CardKind::Button, msg).is_ok());
        assert!(require_array(&json!({"buttons": "x"}), "buttons", CardKind::Button, msg).is_err());
        assert!(require_array(&json!({}), "buttons", CardKind::Button, msg).is_err());
    }
}
