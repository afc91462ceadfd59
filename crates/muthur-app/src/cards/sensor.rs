//! Sensor card: one numeric readout with an optional level bar.

use serde::Deserialize;
use serde_json::{json, Value};

use muthur_core::prelude::*;
use muthur_core::EntitySnapshot;

use super::{default_true, non_empty, parse_config, require_field, CardKind};

pub const TYPE_ID: &str = "muthur-sensor-card";
pub const HEADER: &str = "SENSOR DATA";

const DEFAULT_MAX: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SensorConfig {
    pub entity: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default = "default_true")]
    pub show_graph: bool,
    #[serde(default)]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub name: String,
    /// Raw state string.
    pub value: String,
    pub unit: String,
    /// `state_class` attribute, upper-cased.
    pub state_class: Option<String>,
    /// Bar fill in percent, present when the graph is shown and the state
    /// is numeric.
    pub level: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SensorView {
    Missing { entity_id: String },
    Reading(SensorReading),
}

pub fn validate(config: &Value) -> Result<()> {
    require_field(config, "entity", CardKind::Sensor, "You need to define an entity")
}

pub fn parse(config: &Value) -> Result<SensorConfig> {
    validate(config)?;
    parse_config(CardKind::Sensor, config)
}

pub fn stub_config() -> Value {
    json!({"entity": "", "name": "", "unit": "", "show_graph": true, "max": 100})
}

/// `value / max * 100`, capped to `0..=100`. A zero or missing max counts
/// as 100.
pub fn level_percent(value: f64, max: Option<f64>) -> f64 {
    let max = max.filter(|m| *m != 0.0 && !m.is_nan()).unwrap_or(DEFAULT_MAX);
    (value / max * 100.0).clamp(0.0, 100.0)
}

pub fn view(config: &SensorConfig, snapshot: &EntitySnapshot) -> SensorView {
    let Some(state) = snapshot.get(&config.entity) else {
        return SensorView::Missing {
            entity_id: config.entity.clone(),
        };
    };

    let name = non_empty(&config.name)
        .or_else(|| state.friendly_name())
        .unwrap_or(&config.entity)
        .to_string();
    let unit = non_empty(&config.unit)
        .or_else(|| state.unit())
        .unwrap_or("")
        .to_string();

    let level = match (config.show_graph, state.numeric_state()) {
        (true, Some(value)) => Some(level_percent(value, config.max)),
        _ => None,
    };

    SensorView::Reading(SensorReading {
        name,
        value: state.state.clone(),
        unit,
        state_class: state.attr_str("state_class").map(str::to_uppercase),
        level,
    })
}
