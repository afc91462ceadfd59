//! Entity state as reported by Home Assistant
//!
//! Entities are owned by the host. The dashboard only ever reads them from an
//! [`EntitySnapshot`] and asks for changes through service calls.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::numeric::parse_leading_float;

/// Well-known state strings.
pub const STATE_UNAVAILABLE: &str = "unavailable";
pub const STATE_UNKNOWN: &str = "unknown";
pub const STATE_ON: &str = "on";
pub const STATE_OFF: &str = "off";

/// A single entity as delivered by `get_states` or a `state_changed` event.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EntityState {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_changed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl EntityState {
    pub fn new(entity_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            state: state.into(),
            attributes: Map::new(),
            last_changed: None,
            last_updated: None,
        }
    }

    /// Builder used mostly by tests and fixtures.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The part of the entity id before the first `.`.
    pub fn domain(&self) -> &str {
        entity_domain(&self.entity_id)
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    /// String attribute. Empty strings count as absent.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attribute(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn attr_f64(&self, key: &str) -> Option<f64> {
        match self.attribute(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_leading_float(s),
            _ => None,
        }
    }

    /// Attribute rendered the way a template would print it.
    pub fn attr_display(&self, key: &str) -> Option<String> {
        self.attribute(key).map(value_to_display)
    }

    pub fn friendly_name(&self) -> Option<&str> {
        self.attr_str("friendly_name")
    }

    pub fn unit(&self) -> Option<&str> {
        self.attr_str("unit_of_measurement")
    }

    pub fn icon(&self) -> Option<&str> {
        self.attr_str("icon")
    }

    pub fn is_on(&self) -> bool {
        self.state == STATE_ON
    }

    pub fn is_unavailable(&self) -> bool {
        self.state == STATE_UNAVAILABLE
    }

    /// `unavailable` or `unknown`.
    pub fn is_unreachable(&self) -> bool {
        self.state == STATE_UNAVAILABLE || self.state == STATE_UNKNOWN
    }

    /// Numeric reading of the state, if its leading characters form a number.
    pub fn numeric_state(&self) -> Option<f64> {
        parse_leading_float(&self.state)
    }
}

/// Domain of an entity id (`light.kitchen` -> `light`).
pub fn entity_domain(entity_id: &str) -> &str {
    entity_id.split('.').next().unwrap_or(entity_id)
}

/// Render an attribute value as plain text.
pub fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Full view of every entity the host knows about.
///
/// Replaced entry by entry as `state_changed` events arrive; cards only ever
/// receive `&EntitySnapshot`.
#[derive(Debug, Clone, Default)]
pub struct EntitySnapshot {
    entities: HashMap<String, EntityState>,
}

impl EntitySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_states(states: impl IntoIterator<Item = EntityState>) -> Self {
        Self {
            entities: states
                .into_iter()
                .map(|s| (s.entity_id.clone(), s))
                .collect(),
        }
    }

    pub fn get(&self, entity_id: &str) -> Option<&EntityState> {
        self.entities.get(entity_id)
    }

    /// Apply a `state_changed` event. `None` means the entity was removed.
    pub fn apply(&mut self, entity_id: &str, new_state: Option<EntityState>) {
        match new_state {
            Some(state) => {
                self.entities.insert(entity_id.to_string(), state);
            }
            None => {
                self.entities.remove(entity_id);
            }
        }
    }

    pub fn insert(&mut self, state: EntityState) {
        self.entities.insert(state.entity_id.clone(), state);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Host-wide settings fetched with `get_config`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub unit_system: UnitSystem,
}

impl HostConfig {
    pub fn temperature_unit(&self) -> &str {
        &self.unit_system.temperature
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnitSystem {
    #[serde(default = "default_temperature_unit")]
    pub temperature: String,
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self {
            temperature: default_temperature_unit(),
        }
    }
}

fn default_temperature_unit() -> String {
    "°C".to_string()
}
