//! Button card: a grid of action buttons.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use muthur_core::prelude::*;
use muthur_core::{EntitySnapshot, ServiceCall};

use super::tap_action::{TapAction, TapActionConfig};
use super::{default_true, non_empty, parse_config, require_array, CardKind};
use crate::host::HostRequest;

pub const TYPE_ID: &str = "muthur-button-card";

const DEFAULT_TITLE: &str = "TERMINAL CONTROL";
const DEFAULT_BUTTON_NAME: &str = "Button";
const MAX_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ButtonConfig {
    pub buttons: Vec<ButtonEntry>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub columns: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ButtonEntry {
    Entity(String),
    Detailed(ButtonSpec),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ButtonSpec {
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_true")]
    pub show_state: bool,
    /// `domain.service`; only the service part is used, against the
    /// entity's own domain.
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub tap_action: Option<TapActionConfig>,
    /// `domain.service` for buttons without an entity.
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub service_data: Map<String, Value>,
}

impl ButtonEntry {
    pub fn entity(&self) -> Option<&str> {
        match self {
            ButtonEntry::Entity(id) => Some(id.as_str()).filter(|e| !e.is_empty()),
            ButtonEntry::Detailed(spec) => non_empty(&spec.entity),
        }
    }

    /// What pressing this button asks of the host.
    ///
    /// 1. A `tap_action` wins, with the button's entity as its default target.
    /// 2. With an entity: `<entity domain>.<service>`, the service taken from
    ///    the part of `action` after the `.` (default `toggle`).
    /// 3. With a `service`: that `domain.service` with `service_data`.
    pub fn activate(&self) -> Option<HostRequest> {
        let entity = self.entity();
        let spec = match self {
            ButtonEntry::Detailed(spec) => Some(spec),
            ButtonEntry::Entity(_) => None,
        };

        if let Some(tap) = spec.and_then(|s| s.tap_action.as_ref()) {
            return TapAction::from(tap).resolve(entity);
        }

        if let Some(entity) = entity {
            let service = spec
                .and_then(|s| s.action.as_deref())
                .and_then(|a| a.split('.').nth(1))
                .filter(|s| !s.is_empty())
                .unwrap_or("toggle");
            return Some(HostRequest::CallService(ServiceCall::for_entity(
                entity, service,
            )));
        }

        let spec = spec?;
        let call = ServiceCall::parse(non_empty(&spec.service)?)?;
        Some(HostRequest::CallService(
            call.with_data(spec.service_data.clone()),
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonTile {
    pub name: String,
    pub icon: Option<String>,
    /// Upper-cased entity state when shown.
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonView {
    pub title: String,
    pub columns: usize,
    pub buttons: Vec<ButtonTile>,
}

pub fn validate(config: &Value) -> Result<()> {
    require_array(
        config,
        "buttons",
        CardKind::Button,
        "You need to define buttons as an array",
    )
}

pub fn parse(config: &Value) -> Result<ButtonConfig> {
    validate(config)?;
    parse_config(CardKind::Button, config)
}

pub fn stub_config() -> Value {
    json!({"title": DEFAULT_TITLE, "buttons": [], "columns": 1})
}

impl ButtonConfig {
    /// Grid columns, `1..=3`.
    pub fn columns(&self) -> usize {
        self.columns.unwrap_or(1).clamp(1, MAX_COLUMNS)
    }
}

pub fn view(config: &ButtonConfig, snapshot: &EntitySnapshot) -> ButtonView {
    let buttons = config
        .buttons
        .iter()
        .map(|entry| {
            let state = entry.entity().and_then(|e| snapshot.get(e));
            let spec = match entry {
                ButtonEntry::Detailed(spec) => Some(spec),
                ButtonEntry::Entity(_) => None,
            };

            let name = spec
                .and_then(|s| non_empty(&s.name))
                .or_else(|| state.and_then(|s| s.friendly_name()))
                .unwrap_or(DEFAULT_BUTTON_NAME)
                .to_string();
            let icon = spec
                .and_then(|s| non_empty(&s.icon))
                .or_else(|| state.and_then(|s| s.icon()))
                .map(str::to_string);
            let show_state = spec.map_or(true, |s| s.show_state);

            ButtonTile {
                name,
                icon,
                state: state
                    .filter(|_| show_state)
                    .map(|s| s.state.to_uppercase()),
            }
        })
        .collect();

    ButtonView {
        title: non_empty(&config.title).unwrap_or(DEFAULT_TITLE).to_string(),
        columns: config.columns(),
        buttons,
    }
}
