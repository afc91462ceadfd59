//! Gauge card: a numeric reading shown against a min/max range.

use serde::Deserialize;
use serde_json::{json, Value};

use muthur_core::prelude::*;
use muthur_core::{format_number, EntitySnapshot};

use super::{non_empty, parse_config, require_field, CardKind};

pub const TYPE_ID: &str = "muthur-gauge-card";

const DEFAULT_TITLE: &str = "GAUGE MONITOR";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GaugeConfig {
    pub entity: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub min: f64,
    #[serde(default = "default_max")]
    pub max: f64,
}

fn default_max() -> f64 {
    100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct GaugeReading {
    pub title: String,
    pub name: String,
    /// One decimal place, or `--` for a non-numeric state.
    pub value: String,
    pub unit: String,
    /// `0..=100`
    pub percent: f64,
    pub min: String,
    pub max: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GaugeView {
    Missing { entity_id: String },
    Reading(GaugeReading),
}

pub fn validate(config: &Value) -> Result<()> {
    require_field(config, "entity", CardKind::Gauge, "You need to define an entity")
}

pub fn parse(config: &Value) -> Result<GaugeConfig> {
    validate(config)?;
    parse_config(CardKind::Gauge, config)
}

pub fn stub_config() -> Value {
    json!({
        "entity": "",
        "name": "",
        "title": DEFAULT_TITLE,
        "unit": "",
        "min": 0,
        "max": 100
    })
}

/// Position of `value` in `min..max` as a percentage, clamped to `0..=100`.
/// A zero-width range reads as 0.
pub fn gauge_percent(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span == 0.0 || !span.is_finite() {
        return 0.0;
    }
    let percent = (value - min) / span * 100.0;
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

pub fn view(config: &GaugeConfig, snapshot: &EntitySnapshot) -> GaugeView {
    let Some(state) = snapshot.get(&config.entity) else {
        return GaugeView::Missing {
            entity_id: config.entity.clone(),
        };
    };

    let numeric = state.numeric_state();

    GaugeView::Reading(GaugeReading {
        title: non_empty(&config.title).unwrap_or(DEFAULT_TITLE).to_string(),
        name: non_empty(&config.name)
            .or_else(|| state.friendly_name())
            .unwrap_or(&config.entity)
            .to_string(),
        value: numeric.map_or_else(|| "--".to_string(), |v| format!("{v:.1}")),
        unit: non_empty(&config.unit)
            .or_else(|| state.unit())
            .unwrap_or("")
            .to_string(),
        percent: numeric.map_or(0.0, |v| gauge_percent(v, config.min, config.max)),
        min: format_number(config.min),
        max: format_number(config.max),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use muthur_core::EntityState;

    fn reading(cfg: Value, state: &str) -> GaugeReading {
        let snapshot = EntitySnapshot::from_states([EntityState::new("sensor.core", state)
            .with_attribute("friendly_name", "Core Temp")
            .with_attribute("unit_of_measurement", "°C")]);
        match view(&parse(&cfg).unwrap(), &snapshot) {
            GaugeView::Reading(r) => r,
            other => panic!("Expected Reading, got {:?}", other),
        }
    }

    #[test]
    fn test_entity_required() {
        assert!(validate(&stub_config()).is_err());
    }

    #[test]
    fn test_reading_defaults() {
        let r = reading(json!({"entity": "sensor.core"}), "42");
        assert_eq!(r.title, "GAUGE MONITOR");
        assert_eq!(r.name, "Core Temp");
        assert_eq!(r.value, "42.0");
        assert_eq!(r.unit, "°C");
        assert_eq!(r.percent, 42.0);
        assert_eq!(r.min, "0");
        assert_eq!(r.max, "100");
    }

    #[test]
    fn test_custom_range() {
        let r = reading(json!({"entity": "sensor.core", "min": -20, "max": 60}), "20");
        assert_eq!(r.percent, 50.0);
        assert_eq!(r.min, "-20");
    }

    #[test]
    fn test_clamped_and_non_numeric() {
        assert_eq!(reading(json!({"entity": "sensor.core"}), "140").percent, 100.0);
        assert_eq!(reading(json!({"entity": "sensor.core"}), "-3").percent, 0.0);

        let r = reading(json!({"entity": "sensor.core"}), "unavailable");
        assert_eq!(r.value, "--");
        assert_eq!(r.percent, 0.0);
    }

    #[test]
    fn test_degenerate_range() {
        assert_eq!(gauge_percent(5.0, 10.0, 10.0), 0.0);
    }

    #[test]
    fn test_missing_entity() {
        let cfg = parse(&json!({"entity": "sensor.none"})).unwrap();
        assert!(matches!(
            view(&cfg, &EntitySnapshot::new()),
            GaugeView::Missing { .. }
        ));
    }
}
