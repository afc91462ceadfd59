//! Text card: static or state-driven message with simple templates.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Deserialize;
use serde_json::{json, Value};

use muthur_core::prelude::*;
use muthur_core::{value_to_display, EntitySnapshot, EntityState};

use super::{default_true, non_empty, parse_config, CardKind};

pub const TYPE_ID: &str = "muthur-text-card";

const DEFAULT_TITLE: &str = "MESSAGE";

static ATTRIBUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{attribute\.(\w+)\}\}").expect("Invalid attribute template regex")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Small,
    Large,
    #[default]
    #[serde(other)]
    Medium,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Center,
    Right,
    #[default]
    #[serde(other)]
    Left,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    /// Content per entity state; `default` covers unlisted states.
    #[serde(default)]
    pub state_content: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub size: TextSize,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default = "default_true")]
    pub show_prompt: bool,
    #[serde(default)]
    pub typing_effect: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextView {
    pub title: String,
    pub content: String,
    pub size: TextSize,
    pub align: TextAlign,
    pub show_prompt: bool,
    pub typing_effect: bool,
}

/// Text cards have no required fields.
pub fn validate(_config: &Value) -> Result<()> {
    Ok(())
}

pub fn parse(config: &Value) -> Result<TextConfig> {
    validate(config)?;
    parse_config(CardKind::Text, config)
}

pub fn stub_config() -> Value {
    json!({
        "title": DEFAULT_TITLE,
        "content": "ENTER YOUR MESSAGE HERE",
        "entity": "",
        "state_content": {},
        "size": "medium",
        "align": "left",
        "show_prompt": true,
        "typing_effect": false
    })
}

/// Resolve the content to show.
///
/// With an entity and a `state_content` map, the entry for the current state
/// (or `default`) replaces `content`, then templates are expanded against
/// the entity.
pub fn content(config: &TextConfig, snapshot: &EntitySnapshot) -> String {
    let mut text = config.content.clone().unwrap_or_default();

    let entity = non_empty(&config.entity).and_then(|e| snapshot.get(e));
    if let (Some(state_content), Some(state)) = (&config.state_content, entity) {
        if let Some(per_state) = state_content
            .get(&state.state)
            .filter(|s| !s.is_empty())
            .or_else(|| state_content.get("default").filter(|s| !s.is_empty()))
        {
            text = per_state.clone();
        }
        text = render_templates(&text, state);
    }

    text
}

/// Expand `{{state}}`, `{{friendly_name}}`, `{{unit}}` and
/// `{{attribute.<name>}}`.
///
/// Name and unit placeholders stay verbatim when the entity lacks them, as
/// do attribute placeholders whose attribute is missing or falsy.
pub fn render_templates(template: &str, state: &EntityState) -> String {
    let mut text = template.replace("{{state}}", &state.state);
    if let Some(name) = state.friendly_name() {
        text = text.replace("{{friendly_name}}", name);
    }
    if let Some(unit) = state.unit() {
        text = text.replace("{{unit}}", unit);
    }

    ATTRIBUTE_PATTERN
        .replace_all(&text, |caps: &Captures| {
            match state.attribute(&caps[1]).filter(|v| is_present(v)) {
                Some(value) => value_to_display(value),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

pub fn view(config: &TextConfig, snapshot: &EntitySnapshot) -> TextView {
    TextView {
        title: non_empty(&config.title).unwrap_or(DEFAULT_TITLE).to_string(),
        content: content(config, snapshot),
        size: config.size,
        align: config.align,
        show_prompt: config.show_prompt,
        typing_effect: config.typing_effect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> EntitySnapshot {
        EntitySnapshot::from_states([EntityState::new("sensor.hull", "nominal")
            .with_attribute("friendly_name", "Hull")
            .with_attribute("unit_of_measurement", "psi")
            .with_attribute("pressure", 14.7)
            .with_attribute("breach", false)])
    }

    #[test]
    fn test_static_content() {
        let cfg = parse(&stub_config()).unwrap();
        let view = view(&cfg, &snapshot());
        assert_eq!(view.title, "MESSAGE");
        assert_eq!(view.content, "ENTER YOUR MESSAGE HERE");
        assert_eq!(view.size, TextSize::Medium);
        assert_eq!(view.align, TextAlign::Left);
        assert!(view.show_prompt);
        assert!(!view.typing_effect);
    }

    #[test]
    fn test_unknown_size_and_align_fall_back() {
        let cfg = parse(&json!({"content": "X", "size": "huge", "align": "justify"})).unwrap();
        assert_eq!(cfg.size, TextSize::Medium);
        assert_eq!(cfg.align, TextAlign::Left);

        let cfg = parse(&json!({"content": "X", "size": "large", "align": "right"})).unwrap();
        assert_eq!(cfg.size, TextSize::Large);
        assert_eq!(cfg.align, TextAlign::Right);
    }

    #[test]
    fn test_state_content_selects_by_state() {
        let cfg = parse(&json!({
            "entity": "sensor.hull",
            "content": "fallback",
            "state_content": {
                "nominal": "{{friendly_name}} is {{state}} at {{attribute.pressure}} {{unit}}",
                "default": "CHECK {{state}}"
            }
        }))
        .unwrap();
        assert_eq!(content(&cfg, &snapshot()), "Hull is nominal at 14.7 psi");
    }

    #[test]
    fn test_state_content_default() {
        let cfg = parse(&json!({
            "entity": "sensor.hull",
            "state_content": {"breached": "RUN", "default": "STATUS: {{state}}"}
        }))
        .unwrap();
        assert_eq!(content(&cfg, &snapshot()), "STATUS: nominal");
    }

    #[test]
    fn test_templates_need_state_content() {
        let cfg = parse(&json!({"entity": "sensor.hull", "content": "{{state}}"})).unwrap();
        assert_eq!(content(&cfg, &snapshot()), "{{state}}");
    }

    #[test]
    fn test_missing_entity_keeps_content() {
        let cfg = parse(&json!({
            "entity": "sensor.gone",
            "content": "{{state}}",
            "state_content": {"default": "x"}
        }))
        .unwrap();
        assert_eq!(content(&cfg, &snapshot()), "{{state}}");
    }

    #[test]
    fn test_absent_or_falsy_attribute_left_verbatim() {
        let state = EntityState::new("sensor.x", "1").with_attribute("breach", false);
        assert_eq!(
            render_templates("{{attribute.breach}} {{attribute.nope}} {{friendly_name}}", &state),
            "{{attribute.breach}} {{attribute.nope}} {{friendly_name}}"
        );
    }

    #[test]
    fn test_size_and_align_parse() {
        let cfg = parse(&json!({"size": "large", "align": "center"})).unwrap();
        assert_eq!(cfg.size, TextSize::Large);
        assert_eq!(cfg.align, TextAlign::Center);
    }
}
