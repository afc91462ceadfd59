//! Light card: on/off toggle and brightness for a single light.

use serde::Deserialize;
use serde_json::{json, Value};

use muthur_core::prelude::*;
use muthur_core::{EntitySnapshot, EntityState, ServiceCall};

use super::{non_empty, parse_config, require_field, CardKind};

pub const TYPE_ID: &str = "muthur-light-card";

pub const HEADER: &str = "ILLUMINATION CONTROL";

/// Brightness change per key press, in percent.
pub const BRIGHTNESS_STEP: u8 = 10;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LightConfig {
    pub entity: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightStatus {
    Active,
    Inactive,
    Unavailable,
}

impl LightStatus {
    pub fn label(self) -> &'static str {
        match self {
            LightStatus::Active => "ACTIVE",
            LightStatus::Inactive => "INACTIVE",
            LightStatus::Unavailable => "UNAVAILABLE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightPanel {
    pub name: String,
    pub status: LightStatus,
    pub is_on: bool,
    /// `ON`/`OFF` label for the toggle.
    pub toggle_label: &'static str,
    pub toggle_enabled: bool,
    /// Shown only for lights that support brightness and are on.
    pub brightness_pct: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LightView {
    Missing { entity_id: String },
    Panel(LightPanel),
}

pub fn validate(config: &Value) -> Result<()> {
    require_field(config, "entity", CardKind::Light, "You need to define an entity")
}

pub fn parse(config: &Value) -> Result<LightConfig> {
    validate(config)?;
    parse_config(CardKind::Light, config)
}

pub fn stub_config() -> Value {
    json!({"entity": "", "name": ""})
}

/// Brightness support from `supported_color_modes` or a brightness reading.
pub fn supports_brightness(state: &EntityState) -> bool {
    let by_mode = state
        .attribute("supported_color_modes")
        .and_then(Value::as_array)
        .is_some_and(|modes| modes.iter().any(|m| m.as_str() == Some("brightness")));
    by_mode || state.attribute("brightness").is_some()
}

/// `0..=255` brightness as a rounded percentage.
pub fn brightness_percent(brightness: f64) -> u8 {
    (brightness / 255.0 * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Percentage back to the `0..=255` scale.
pub fn brightness_value(pct: u8) -> u8 {
    (f64::from(pct.min(100)) / 100.0 * 255.0).round() as u8
}

pub fn view(config: &LightConfig, snapshot: &EntitySnapshot) -> LightView {
    let Some(state) = snapshot.get(&config.entity) else {
        return LightView::Missing {
            entity_id: config.entity.clone(),
        };
    };

    let is_on = state.is_on();
    let status = if state.is_unavailable() {
        LightStatus::Unavailable
    } else if is_on {
        LightStatus::Active
    } else {
        LightStatus::Inactive
    };

    let brightness_pct = (is_on && supports_brightness(state))
        .then(|| brightness_percent(state.attr_f64("brightness").unwrap_or(0.0)));

    LightView::Panel(LightPanel {
        name: non_empty(&config.name)
            .or_else(|| state.friendly_name())
            .unwrap_or(&config.entity)
            .to_string(),
        status,
        is_on,
        toggle_label: if is_on { "ON" } else { "OFF" },
        toggle_enabled: status != LightStatus::Unavailable,
        brightness_pct,
    })
}

/// The call a toggle press makes, or `None` when the light is missing or
/// unavailable.
pub fn toggle_call(config: &LightConfig, snapshot: &EntitySnapshot) -> Option<ServiceCall> {
    let state = snapshot.get(&config.entity)?;
    if state.is_unavailable() {
        return None;
    }
    let service = if state.is_on() { "turn_off" } else { "turn_on" };
    Some(ServiceCall::new("light", service).with_entity(&config.entity))
}

pub fn brightness_call(entity_id: &str, pct: u8) -> ServiceCall {
    ServiceCall::new("light", "turn_on")
        .with_entity(entity_id)
        .with("brightness", brightness_value(pct))
}

/// Step the current brightness by `delta` percent, for lights showing the
/// brightness control.
pub fn step_brightness(
    config: &LightConfig,
    snapshot: &EntitySnapshot,
    delta: i16,
) -> Option<ServiceCall> {
    let LightView::Panel(panel) = view(config, snapshot) else {
        return None;
    };
    let current = panel.brightness_pct?;
    let target = (i16::from(current) + delta).clamp(1, 100) as u8;
    (target != current).then(|| brightness_call(&config.entity, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LightConfig {
        parse(&json!({"entity": "light.bridge"})).unwrap()
    }

    fn snapshot(state: EntityState) -> EntitySnapshot {
        EntitySnapshot::from_states([state])
    }

    fn dimmable(state: &str, brightness: u8) -> EntityState {
        EntityState::new("light.bridge", state)
            .with_attribute("friendly_name", "Bridge")
            .with_attribute("supported_color_modes", json!(["brightness"]))
            .with_attribute("brightness", brightness)
    }

    #[test]
    fn test_entity_required() {
        assert!(validate(&stub_config()).is_err());
    }

    #[test]
    fn test_panel_on_with_brightness() {
        match view(&config(), &snapshot(dimmable("on", 128))) {
            LightView::Panel(p) => {
                assert_eq!(p.name, "Bridge");
                assert_eq!(p.status, LightStatus::Active);
                assert_eq!(p.toggle_label, "ON");
                assert!(p.toggle_enabled);
                assert_eq!(p.brightness_pct, Some(50));
            }
            other => panic!("Expected Panel, got {:?}", other),
        }
    }

    #[test]
    fn test_brightness_hidden_when_off_or_unsupported() {
        let LightView::Panel(off) = view(&config(), &snapshot(dimmable("off", 0))) else {
            panic!("Expected Panel");
        };
        assert_eq!(off.status, LightStatus::Inactive);
        assert_eq!(off.brightness_pct, None);

        let plain = EntityState::new("light.bridge", "on");
        let LightView::Panel(on) = view(&config(), &snapshot(plain)) else {
            panic!("Expected Panel");
        };
        assert_eq!(on.brightness_pct, None);
    }

    #[test]
    fn test_unavailable_disables_toggle() {
        let state = EntityState::new("light.bridge", "unavailable");
        let LightView::Panel(p) = view(&config(), &snapshot(state.clone())) else {
            panic!("Expected Panel");
        };
        assert_eq!(p.status.label(), "UNAVAILABLE");
        assert!(!p.toggle_enabled);
        assert_eq!(toggle_call(&config(), &snapshot(state)), None);
    }

    #[test]
    fn test_toggle_call_direction() {
        let on = toggle_call(&config(), &snapshot(dimmable("on", 10))).unwrap();
        assert_eq!(on.qualified_name(), "light.turn_off");
        assert_eq!(on.entity_id(), Some("light.bridge"));

        let off = toggle_call(&config(), &snapshot(dimmable("off", 0))).unwrap();
        assert_eq!(off.qualified_name(), "light.turn_on");
    }

    #[test]
    fn test_brightness_conversion() {
        assert_eq!(brightness_percent(255.0), 100);
        assert_eq!(brightness_percent(1.0), 0);
        assert_eq!(brightness_value(50), 128);
        assert_eq!(brightness_value(100), 255);

        let call = brightness_call("light.bridge", 40);
        assert_eq!(call.service_data.get("brightness"), Some(&json!(102)));
    }

    #[test]
    fn test_step_brightness() {
        let snap = snapshot(dimmable("on", 128));
        let up = step_brightness(&config(), &snap, 10).unwrap();
        assert_eq!(up.service_data.get("brightness"), Some(&json!(153)));

        let full = snapshot(dimmable("on", 255));
        assert_eq!(step_brightness(&config(), &full, 10), None);

        let off = snapshot(dimmable("off", 0));
        assert_eq!(step_brightness(&config(), &off, 10), None);
    }

    #[test]
    fn test_missing_entity() {
        assert_eq!(
            view(&config(), &EntitySnapshot::new()),
            LightView::Missing {
                entity_id: "light.bridge".into()
            }
        );
    }
}
