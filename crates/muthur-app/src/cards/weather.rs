//! Weather card: current conditions, details and a short forecast.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};

use muthur_core::prelude::*;
use muthur_core::{value_to_display, EntitySnapshot, EntityState, HostConfig};

use super::{default_true, non_empty, parse_config, require_field, CardKind};

pub const TYPE_ID: &str = "muthur-weather-card";

const DEFAULT_NAME: &str = "Weather";
const DEFAULT_FORECAST_DAYS: usize = 5;
const FALLBACK_ICON: &str = "🌡️";

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherConfig {
    pub entity: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub show_forecast: bool,
    #[serde(default)]
    pub forecast_days: Option<usize>,
}

impl WeatherConfig {
    pub fn forecast_days(&self) -> usize {
        self.forecast_days
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_FORECAST_DAYS)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherDetail {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    /// Short weekday, upper-cased (`FRI`).
    pub day: String,
    pub icon: &'static str,
    pub high: String,
    pub low: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub header: String,
    pub icon: &'static str,
    pub temperature: String,
    pub temperature_unit: String,
    pub condition: String,
    pub details: Vec<WeatherDetail>,
    /// Empty when the forecast is hidden or the entity has none.
    pub forecast: Vec<ForecastDay>,
    pub attribution: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherView {
    Missing { entity_id: String },
    Report(WeatherReport),
}

pub fn validate(config: &Value) -> Result<()> {
    require_field(
        config,
        "entity",
        CardKind::Weather,
        "You need to define a weather entity",
    )
}

pub fn parse(config: &Value) -> Result<WeatherConfig> {
    validate(config)?;
    parse_config(CardKind::Weather, config)
}

pub fn stub_config() -> Value {
    json!({"entity": "", "name": "", "show_forecast": true, "forecast_days": 5})
}

pub fn condition_icon(condition: &str) -> &'static str {
    match condition {
        "clear-night" => "🌙",
        "cloudy" => "☁️",
        "fog" => "🌫️",
        "hail" => "🌨️",
        "lightning" => "⚡",
        "lightning-rainy" => "⛈️",
        "partlycloudy" => "⛅",
        "pouring" => "🌧️",
        "rainy" => "🌦️",
        "snowy" => "❄️",
        "snowy-rainy" => "🌨️",
        "sunny" => "☀️",
        "windy" => "💨",
        "windy-variant" => "🌬️",
        "exceptional" => "⚠️",
        _ => FALLBACK_ICON,
    }
}

/// 16-point compass direction for a bearing in degrees.
pub fn wind_direction(bearing: f64) -> &'static str {
    let sector = (bearing / 22.5).round().rem_euclid(16.0) as usize;
    COMPASS[sector % 16]
}

fn details(state: &EntityState) -> Vec<WeatherDetail> {
    let unit_or = |key: &str, fallback: &str| {
        state.attr_str(key).unwrap_or(fallback).to_string()
    };
    let mut details = Vec::new();

    if let Some(humidity) = state.attr_display("humidity") {
        details.push(WeatherDetail {
            label: "Humidity",
            value: format!("{humidity}%"),
        });
    }
    if let Some(pressure) = state.attr_display("pressure") {
        details.push(WeatherDetail {
            label: "Pressure",
            value: format!("{pressure} {}", unit_or("pressure_unit", "hPa")),
        });
    }
    if let Some(speed) = state.attr_display("wind_speed") {
        details.push(WeatherDetail {
            label: "Wind Speed",
            value: format!("{speed} {}", unit_or("wind_speed_unit", "km/h")),
        });
    }
    if let Some(bearing) = state.attr_f64("wind_bearing") {
        details.push(WeatherDetail {
            label: "Wind Dir",
            value: wind_direction(bearing).to_string(),
        });
    }
    if let Some(visibility) = state.attr_display("visibility") {
        details.push(WeatherDetail {
            label: "Visibility",
            value: format!("{visibility} {}", unit_or("visibility_unit", "km")),
        });
    }

    details
}

fn weekday(datetime: &str) -> String {
    let date = DateTime::parse_from_rfc3339(datetime)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(datetime, "%Y-%m-%d"));
    match date {
        Ok(date) => date.format("%a").to_string().to_uppercase(),
        Err(_) => "---".to_string(),
    }
}

fn forecast(state: &EntityState, days: usize) -> Vec<ForecastDay> {
    let Some(entries) = state.attribute("forecast").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .take(days)
        .map(|entry| {
            let field = |key: &str| entry.get(key).filter(|v| !v.is_null());
            ForecastDay {
                day: field("datetime")
                    .and_then(Value::as_str)
                    .map_or_else(|| "---".to_string(), weekday),
                icon: condition_icon(field("condition").and_then(Value::as_str).unwrap_or("")),
                high: format!("{}°", field("temperature").map(value_to_display).unwrap_or_default()),
                low: field("templow").map(|v| format!("{}°", value_to_display(v))),
            }
        })
        .collect()
}

pub fn view(config: &WeatherConfig, snapshot: &EntitySnapshot, host: &HostConfig) -> WeatherView {
    let Some(state) = snapshot.get(&config.entity) else {
        return WeatherView::Missing {
            entity_id: config.entity.clone(),
        };
    };

    WeatherView::Report(WeatherReport {
        header: non_empty(&config.name)
            .or_else(|| state.friendly_name())
            .unwrap_or(DEFAULT_NAME)
            .to_uppercase(),
        icon: condition_icon(&state.state),
        temperature: state.attr_display("temperature").unwrap_or_default(),
        temperature_unit: host.temperature_unit().to_string(),
        condition: state.state.clone(),
        details: details(state),
        forecast: if config.show_forecast {
            forecast(state, config.forecast_days())
        } else {
            Vec::new()
        },
        attribution: state.attr_str("attribution").map(str::to_string),
    })
}
