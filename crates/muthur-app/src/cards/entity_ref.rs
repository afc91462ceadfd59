//! Entity references in card configuration.
//!
//! A list entry may be a bare id (`"sensor.reactor"`) or a table with
//! overrides (`{ entity = "light.bridge", name = "BRIDGE", icon = "💡" }`).

use serde::{Deserialize, Serialize};

use muthur_core::{EntitySnapshot, EntityState};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EntityRef {
    Bare(String),
    Detailed {
        entity: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
    },
}

/// An [`EntityRef`] with the optional overrides normalised.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntity {
    pub entity_id: String,
    pub name: Option<String>,
    pub icon: Option<String>,
}

impl EntityRef {
    pub fn entity_id(&self) -> &str {
        match self {
            EntityRef::Bare(id) => id,
            EntityRef::Detailed { entity, .. } => entity,
        }
    }

    pub fn resolve(&self) -> ResolvedEntity {
        match self {
            EntityRef::Bare(id) => ResolvedEntity {
                entity_id: id.clone(),
                name: None,
                icon: None,
            },
            EntityRef::Detailed { entity, name, icon } => ResolvedEntity {
                entity_id: entity.clone(),
                name: non_empty(name),
                icon: non_empty(icon),
            },
        }
    }
}

impl ResolvedEntity {
    pub fn lookup<'a>(&self, snapshot: &'a EntitySnapshot) -> Option<&'a EntityState> {
        snapshot.get(&self.entity_id)
    }

    /// Configured name, else the entity's friendly name, else the id.
    pub fn label(&self, state: Option<&EntityState>) -> String {
        self.name
            .clone()
            .or_else(|| state.and_then(|s| s.friendly_name()).map(str::to_string))
            .unwrap_or_else(|| self.entity_id.clone())
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}
