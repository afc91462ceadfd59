//! Glance card: compact grid of entities, each opening its detail view.

use serde::Deserialize;
use serde_json::{json, Value};

use muthur_core::prelude::*;
use muthur_core::EntitySnapshot;

use super::{non_empty, parse_config, require_array, CardKind, EntityRef};
use crate::host::HostRequest;

pub const TYPE_ID: &str = "muthur-glance-card";

const DEFAULT_TITLE: &str = "SYSTEM OVERVIEW";
const DEFAULT_ICON: &str = "⚙";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GlanceConfig {
    pub entities: Vec<EntityRef>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub columns: Option<usize>,
}

impl GlanceConfig {
    /// Grid columns, `2..=4`, default 3.
    pub fn columns(&self) -> usize {
        self.columns.filter(|c| *c > 0).unwrap_or(3).clamp(2, 4)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlanceCell {
    pub entity_id: String,
    pub name: String,
    /// `None` for entities missing from the snapshot.
    pub icon: Option<String>,
    pub state: String,
    pub unit: String,
    /// Missing, `unavailable` or `unknown`.
    pub unavailable: bool,
    /// Only present entities open a detail view.
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlanceView {
    pub title: String,
    pub columns: usize,
    pub cells: Vec<GlanceCell>,
}

pub fn validate(config: &Value) -> Result<()> {
    require_array(
        config,
        "entities",
        CardKind::Glance,
        "You need to define entities as an array",
    )
}

pub fn parse(config: &Value) -> Result<GlanceConfig> {
    validate(config)?;
    parse_config(CardKind::Glance, config)
}

pub fn stub_config() -> Value {
    json!({"title": DEFAULT_TITLE, "entities": [], "columns": 3})
}

pub fn view(config: &GlanceConfig, snapshot: &EntitySnapshot) -> GlanceView {
    let cells = config
        .entities
        .iter()
        .map(|entry| {
            let resolved = entry.resolve();
            match resolved.lookup(snapshot) {
                None => GlanceCell {
                    name: resolved.entity_id.clone(),
                    entity_id: resolved.entity_id,
                    icon: None,
                    state: "UNAVAILABLE".to_string(),
                    unit: String::new(),
                    unavailable: true,
                    clickable: false,
                },
                Some(state) => GlanceCell {
                    name: resolved.label(Some(state)),
                    icon: Some(
                        resolved
                            .icon
                            .clone()
                            .or_else(|| state.icon().map(str::to_string))
                            .unwrap_or_else(|| DEFAULT_ICON.to_string()),
                    ),
                    state: state.state.to_uppercase(),
                    unit: state.unit().unwrap_or("").to_string(),
                    unavailable: state.is_unreachable(),
                    clickable: true,
                    entity_id: resolved.entity_id,
                },
            }
        })
        .collect();

    GlanceView {
        title: non_empty(&config.title).unwrap_or(DEFAULT_TITLE).to_string(),
        columns: config.columns(),
        cells,
    }
}

/// Activating a cell opens the entity's detail view.
pub fn activate(config: &GlanceConfig, snapshot: &EntitySnapshot, index: usize) -> Option<HostRequest> {
    let entity_id = config.entities.get(index)?.entity_id();
    snapshot.get(entity_id)?;
    Some(HostRequest::ShowDetail {
        entity_id: entity_id.to_string(),
    })
}
