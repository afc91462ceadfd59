//! Card type registry
//!
//! Built once at startup with [`CardRegistry::builtin`] and passed to whatever
//! needs to look card types up (config loading, `--list-cards`,
//! `--print-stub`). There is no global list.

use serde_json::Value;

use muthur_core::prelude::*;

use crate::cards::{
    alarm, button, clock, gauge, glance, light, picture, sensor, status, text, weather, Card,
    CardKind,
};

/// One registered card type.
#[derive(Debug, Clone, Copy)]
pub struct CardRegistration {
    pub kind: CardKind,
    pub type_id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    stub: fn() -> Value,
    validator: fn(&Value) -> Result<()>,
    builder: fn(&Value) -> Result<Card>,
}

impl CardRegistration {
    /// A minimal configuration to start from.
    pub fn stub_config(&self) -> Value {
        let mut stub = (self.stub)();
        if let Value::Object(map) = &mut stub {
            map.insert("type".into(), Value::String(self.type_id.to_string()));
        }
        stub
    }

    /// Required-field check run whenever a configuration is set.
    pub fn validate(&self, config: &Value) -> Result<()> {
        (self.validator)(config)
    }

    pub fn build(&self, config: &Value) -> Result<Card> {
        (self.builder)(config)
    }
}

#[derive(Debug, Clone)]
pub struct CardRegistry {
    cards: Vec<CardRegistration>,
}

macro_rules! registration {
    ($kind:ident, $module:ident, $name:literal, $description:literal) => {
        CardRegistration {
            kind: CardKind::$kind,
            type_id: $module::TYPE_ID,
            display_name: $name,
            description: $description,
            stub: $module::stub_config,
            validator: $module::validate,
            builder: |config| $module::parse(config).map(Card::$kind),
        }
    };
}

impl CardRegistry {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Registry with every built-in card type, in [`CardKind::ALL`] order.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for registration in [
            registration!(
                Status,
                status,
                "MU/TH/UR 6000 Status Card",
                "Display system status in classic MU/TH/UR 6000 terminal style"
            ),
            registration!(
                Sensor,
                sensor,
                "MU/TH/UR 6000 Sensor Card",
                "Display sensor data with retro terminal aesthetics"
            ),
            registration!(
                Button,
                button,
                "MU/TH/UR 6000 Button Card",
                "Control entities with terminal-style buttons"
            ),
            registration!(
                Text,
                text,
                "MU/TH/UR 6000 Text Card",
                "Display text messages in terminal format"
            ),
            registration!(
                Gauge,
                gauge,
                "MU/TH/UR 6000 Gauge Card",
                "Display gauge visualization for numeric sensors"
            ),
            registration!(
                Clock,
                clock,
                "MU/TH/UR 6000 Clock Card",
                "Display current time in terminal format"
            ),
            registration!(
                Glance,
                glance,
                "MU/TH/UR 6000 Glance Card",
                "Compact multi-entity overview in terminal style"
            ),
            registration!(
                Light,
                light,
                "MU/TH/UR 6000 Light Card",
                "Control lights with terminal-style interface"
            ),
            registration!(
                Picture,
                picture,
                "MU/TH/UR 6000 Picture Card",
                "Display images and camera feeds in terminal style"
            ),
            registration!(
                Weather,
                weather,
                "MU/TH/UR 6000 Weather Card",
                "Display weather information in terminal format"
            ),
            registration!(
                Alarm,
                alarm,
                "MU/TH/UR 6000 Alarm Card",
                "Control alarm systems with terminal-style keypad"
            ),
        ] {
            registry.register(registration);
        }
        registry
    }

    /// Add a card type. A later registration for the same type id replaces
    /// the earlier one.
    pub fn register(&mut self, registration: CardRegistration) {
        if let Some(existing) = self
            .cards
            .iter_mut()
            .find(|c| c.type_id == registration.type_id)
        {
            warn!("Card type {} registered twice", registration.type_id);
            *existing = registration;
        } else {
            self.cards.push(registration);
        }
    }

    pub fn get(&self, type_id: &str) -> Option<&CardRegistration> {
        self.cards.iter().find(|c| c.type_id == type_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardRegistration> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Validate and build a card from its configuration mapping, dispatching
    /// on the `type` field.
    pub fn build(&self, config: &Value) -> Result<Card> {
        let type_id = config
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::config_invalid("card is missing a `type`"))?;
        let registration = self
            .get(type_id)
            .ok_or_else(|| Error::unknown_card_type(type_id))?;
        registration.validate(config)?;
        registration.build(config)
    }
}

impl Default for CardRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
