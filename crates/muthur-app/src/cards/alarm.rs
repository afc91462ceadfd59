//! Alarm card: keypad code entry and arm/disarm requests.
//!
//! The alarm panel's state belongs to the host. The card only keeps the code
//! being typed and the last error, issues arm/disarm calls and shows whatever
//! state the host reports afterwards.
//!
//! Requests are not de-duplicated: a second arm or disarm may be sent while
//! the first is still outstanding, and each completion is applied as it
//! arrives.

use serde::Deserialize;
use serde_json::{json, Value};

use muthur_core::prelude::*;
use muthur_core::{EntitySnapshot, EntityState, ServiceCall};

use super::{default_true, non_empty, parse_config, require_field, CardKind};

pub const TYPE_ID: &str = "muthur-alarm-card";

pub const DOMAIN: &str = "alarm_control_panel";

/// Longest code the keypad accepts.
pub const MAX_CODE_LEN: usize = 10;

pub const INVALID_CODE: &str = "INVALID CODE";
pub const CODE_REQUIRED: &str = "CODE REQUIRED";

const DEFAULT_TITLE: &str = "SECURITY SYSTEM";
const STATE_DISARMED: &str = "disarmed";

/// Keys in display order, three per row.
pub const KEYPAD_LAYOUT: [&str; 12] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "CLR", "0", "OK"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlarmConfig {
    pub entity: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_true")]
    pub show_keypad: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmMode {
    Away,
    Home,
}

impl ArmMode {
    pub fn service(self) -> &'static str {
        match self {
            ArmMode::Away => "alarm_arm_away",
            ArmMode::Home => "alarm_arm_home",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ArmMode::Away => "ARM AWAY",
            ArmMode::Home => "ARM HOME",
        }
    }
}

/// Top-level buttons offered for the reported state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmAction {
    Arm(ArmMode),
    Disarm,
}

impl AlarmAction {
    pub fn label(self) -> &'static str {
        match self {
            AlarmAction::Arm(mode) => mode.label(),
            AlarmAction::Disarm => "DISARM",
        }
    }
}

/// Arm buttons while disarmed, a single disarm button otherwise.
pub fn available_actions(state: &str) -> &'static [AlarmAction] {
    if state == STATE_DISARMED {
        &[AlarmAction::Arm(ArmMode::Away), AlarmAction::Arm(ArmMode::Home)]
    } else {
        &[AlarmAction::Disarm]
    }
}

/// Display text for a reported alarm state.
pub fn state_display(state: &str) -> String {
    match state {
        "disarmed" => "DISARMED",
        "armed_away" => "ARMED - AWAY",
        "armed_home" => "ARMED - HOME",
        "armed_night" => "ARMED - NIGHT",
        "armed_vacation" => "ARMED - VACATION",
        "armed_custom_bypass" => "ARMED - CUSTOM",
        "pending" => "PENDING",
        "arming" => "ARMING",
        "disarming" => "DISARMING",
        "triggered" => "⚠ ALARM TRIGGERED ⚠",
        "unavailable" => "UNAVAILABLE",
        "unknown" => "UNKNOWN",
        other => return other.to_uppercase(),
    }
    .to_string()
}

// ─────────────────────────────────────────────────────────
// Keypad state
// ─────────────────────────────────────────────────────────

/// Code entry for one alarm card.
///
/// `entered_code` never exceeds [`MAX_CODE_LEN`] digits and is cleared after
/// every arm/disarm attempt, successful or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlarmKeypad {
    entered_code: String,
    last_error: Option<String>,
}

impl AlarmKeypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entered_code(&self) -> &str {
        &self.entered_code
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Append a digit. Ignored once the code is full.
    pub fn press_digit(&mut self, digit: char) {
        if !digit.is_ascii_digit() || self.entered_code.len() >= MAX_CODE_LEN {
            return;
        }
        self.entered_code.push(digit);
        self.last_error = None;
    }

    pub fn press_clear(&mut self) {
        self.entered_code.clear();
        self.last_error = None;
    }

    /// `OK`: while disarmed the local code is dropped without sending
    /// anything; in any other state it is a disarm attempt. Does nothing when
    /// the entity is missing.
    pub fn press_confirm(
        &mut self,
        config: &AlarmConfig,
        state: Option<&EntityState>,
    ) -> Option<ServiceCall> {
        let state = state?;
        if state.state == STATE_DISARMED {
            self.entered_code.clear();
            None
        } else {
            self.disarm(config)
        }
    }

    /// Arm request carrying the entered code, if any.
    pub fn arm(&self, config: &AlarmConfig, mode: ArmMode) -> ServiceCall {
        self.request(config, mode.service())
    }

    /// Disarm request, or `None` with [`CODE_REQUIRED`] set when the keypad
    /// is shown and no code was entered.
    pub fn disarm(&mut self, config: &AlarmConfig) -> Option<ServiceCall> {
        if config.show_keypad && self.entered_code.is_empty() {
            self.last_error = Some(CODE_REQUIRED.to_string());
            return None;
        }
        Some(self.request(config, "alarm_disarm"))
    }

    /// Apply the outcome of an arm/disarm call. Every rejection reads as
    /// [`INVALID_CODE`].
    pub fn on_request_finished(&mut self, result: &std::result::Result<(), String>) {
        self.entered_code.clear();
        self.last_error = match result {
            Ok(()) => None,
            Err(_) => Some(INVALID_CODE.to_string()),
        };
    }

    fn request(&self, config: &AlarmConfig, service: &str) -> ServiceCall {
        let call = ServiceCall::new(DOMAIN, service).with_entity(&config.entity);
        if self.entered_code.is_empty() {
            call
        } else {
            call.with("code", self.entered_code.clone())
        }
    }
}

// ─────────────────────────────────────────────────────────
// View
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct AlarmPanel {
    pub title: String,
    pub state: String,
    pub state_display: String,
    pub triggered: bool,
    pub show_keypad: bool,
    /// `•` per digit, or `ENTER CODE` when empty.
    pub code_display: String,
    pub error: Option<String>,
    pub actions: &'static [AlarmAction],
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlarmView {
    Missing { title: String },
    Panel(AlarmPanel),
}

pub fn validate(config: &Value) -> Result<()> {
    require_field(
        config,
        "entity",
        CardKind::Alarm,
        "You need to define an alarm_control_panel entity",
    )
}

pub fn parse(config: &Value) -> Result<AlarmConfig> {
    validate(config)?;
    parse_config(CardKind::Alarm, config)
}

pub fn stub_config() -> Value {
    json!({"title": DEFAULT_TITLE, "entity": "", "show_keypad": true})
}

pub fn code_display(code: &str) -> String {
    if code.is_empty() {
        "ENTER CODE".to_string()
    } else {
        "•".repeat(code.chars().count())
    }
}

pub fn view(config: &AlarmConfig, keypad: &AlarmKeypad, snapshot: &EntitySnapshot) -> AlarmView {
    let title = non_empty(&config.title).unwrap_or(DEFAULT_TITLE).to_string();
    let Some(state) = snapshot.get(&config.entity) else {
        return AlarmView::Missing { title };
    };

    AlarmView::Panel(AlarmPanel {
        title,
        state_display: state_display(&state.state),
        triggered: state.state == "triggered",
        state: state.state.clone(),
        show_keypad: config.show_keypad,
        code_display: code_display(keypad.entered_code()),
        error: keypad.last_error().map(str::to_string),
        actions: available_actions(&state.state),
    })
}
