//! Clock card: local date and time, refreshed every second.

use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use serde::Deserialize;
use serde_json::{json, Value};

use muthur_core::prelude::*;

use super::{default_true, non_empty, parse_config, CardKind};

pub const TYPE_ID: &str = "muthur-clock-card";

/// Fixed refresh period.
pub const TICK: Duration = Duration::from_secs(1);

const DEFAULT_TITLE: &str = "SYSTEM CHRONOMETER";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClockConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_true")]
    pub show_seconds: bool,
    #[serde(default = "default_true")]
    pub show_timezone: bool,
    #[serde(default)]
    pub format_24h: Option<bool>,
    #[serde(default)]
    pub format_12h: Option<bool>,
}

impl ClockConfig {
    /// 12-hour display when `format_24h = false` or `format_12h = true`.
    pub fn twelve_hour(&self) -> bool {
        self.format_24h == Some(false) || self.format_12h == Some(true)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClockView {
    pub title: String,
    /// `FRIDAY, OCTOBER 16, 2026`
    pub date: String,
    pub time: String,
    pub timezone: Option<String>,
}

/// Clock cards have no required fields.
pub fn validate(_config: &Value) -> Result<()> {
    Ok(())
}

pub fn parse(config: &Value) -> Result<ClockConfig> {
    validate(config)?;
    parse_config(CardKind::Clock, config)
}

pub fn stub_config() -> Value {
    json!({
        "title": DEFAULT_TITLE,
        "show_seconds": true,
        "show_timezone": true,
        "format_12h": false
    })
}

/// The zone name from `TZ`, else the local UTC offset.
pub fn timezone_label() -> String {
    std::env::var("TZ")
        .ok()
        .map(|tz| tz.trim_start_matches(':').to_string())
        .filter(|tz| !tz.is_empty())
        .unwrap_or_else(|| Local::now().format("UTC%:z").to_string())
}

pub fn view<Tz: TimeZone>(config: &ClockConfig, now: &DateTime<Tz>, timezone: &str) -> ClockView
where
    Tz::Offset: std::fmt::Display,
{
    let time_format = match (config.twelve_hour(), config.show_seconds) {
        (false, true) => "%H:%M:%S",
        (false, false) => "%H:%M",
        (true, true) => "%I:%M:%S %p",
        (true, false) => "%I:%M %p",
    };

    ClockView {
        title: non_empty(&config.title).unwrap_or(DEFAULT_TITLE).to_string(),
        date: now.format("%A, %B %-d, %Y").to_string().to_uppercase(),
        time: now.format(time_format).to_string(),
        timezone: config.show_timezone.then(|| timezone.to_string()),
    }
}
