//! Picture card: a camera feed or static image URL with refresh handling.
//!
//! No image is decoded. The card tracks the URL that would be fetched, a
//! loading flag for manual refreshes, and when the feed was last refreshed.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use muthur_core::prelude::*;
use muthur_core::EntitySnapshot;
use muthur_hass::resolve_media_url;

use super::{non_empty, parse_config, CardKind};

pub const TYPE_ID: &str = "muthur-picture-card";

/// How long a manual refresh shows the loading state.
pub const REFRESH_DELAY: Duration = Duration::from_millis(500);

const DEFAULT_TITLE: &str = "VISUAL FEED";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PictureConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub show_timestamp: bool,
    /// Seconds between automatic refreshes; 0 disables them.
    #[serde(default)]
    pub camera_refresh_interval: u64,
}

impl PictureConfig {
    /// Period of the automatic refresh timer, if this card has one.
    pub fn refresh_interval(&self) -> Option<Duration> {
        non_empty(&self.entity)?;
        (self.camera_refresh_interval > 0)
            .then(|| Duration::from_secs(self.camera_refresh_interval))
    }

    pub fn can_refresh(&self) -> bool {
        non_empty(&self.entity).is_some()
    }
}

/// Runtime state of one picture card.
#[derive(Debug, Clone, PartialEq)]
pub struct PictureFeed {
    pub image_url: Option<String>,
    pub loading: bool,
    /// Set when the entity has no picture to show.
    pub error: bool,
    pub last_refresh: DateTime<Utc>,
    /// `entity_picture` the current URL was built from.
    source: Option<String>,
}

impl PictureFeed {
    pub fn new(
        config: &PictureConfig,
        snapshot: &EntitySnapshot,
        base: &Url,
        now: DateTime<Utc>,
    ) -> Self {
        let mut feed = Self {
            image_url: None,
            loading: false,
            error: false,
            last_refresh: now,
            source: None,
        };
        feed.recompute(config, snapshot, base, now);
        feed
    }

    /// Rebuild the image URL with a fresh cache-busting parameter.
    pub fn recompute(
        &mut self,
        config: &PictureConfig,
        snapshot: &EntitySnapshot,
        base: &Url,
        now: DateTime<Utc>,
    ) {
        self.last_refresh = now;
        self.loading = false;

        if let Some(entity) = non_empty(&config.entity) {
            self.source = snapshot
                .get(entity)
                .and_then(|s| s.attr_str("entity_picture"))
                .map(str::to_string);
            match &self.source {
                Some(picture) => {
                    self.image_url = Some(cache_busted(
                        &resolve_media_url(base, picture),
                        now.timestamp_millis(),
                    ));
                    self.error = false;
                }
                None => {
                    self.image_url = None;
                    self.error = true;
                }
            }
        } else {
            self.source = None;
            self.image_url = non_empty(&config.image).map(str::to_string);
            self.error = self.image_url.is_none();
        }
    }

    /// Start a manual refresh. Returns `false` when there is nothing to
    /// refresh.
    pub fn begin_refresh(&mut self, config: &PictureConfig) -> bool {
        if !config.can_refresh() {
            return false;
        }
        self.loading = true;
        true
    }

    /// Recompute after an entity update, but only when its picture changed.
    pub fn on_entity_changed(
        &mut self,
        config: &PictureConfig,
        snapshot: &EntitySnapshot,
        base: &Url,
        now: DateTime<Utc>,
    ) {
        let Some(entity) = non_empty(&config.entity) else {
            return;
        };
        let picture = snapshot
            .get(entity)
            .and_then(|s| s.attr_str("entity_picture"));
        if picture != self.source.as_deref() {
            self.recompute(config, snapshot, base, now);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PictureView {
    pub title: String,
    pub image_url: Option<String>,
    pub loading: bool,
    pub error: bool,
    pub caption: Option<String>,
    /// Upper-cased entity state, when the card has an entity.
    pub status: Option<String>,
    /// `OCT 16, 2026, 14:05:09`
    pub captured: Option<String>,
    pub can_refresh: bool,
}

pub fn validate(config: &Value) -> Result<()> {
    let has = |key: &str| super::is_truthy(config.get(key));
    if has("entity") || has("image") {
        Ok(())
    } else {
        Err(Error::missing_field(
            TYPE_ID,
            "You need to define either an entity (camera) or image URL",
        ))
    }
}

pub fn parse(config: &Value) -> Result<PictureConfig> {
    validate(config)?;
    parse_config(CardKind::Picture, config)
}

pub fn stub_config() -> Value {
    json!({
        "title": DEFAULT_TITLE,
        "entity": "",
        "image": "",
        "caption": "",
        "show_timestamp": false,
        "camera_refresh_interval": 0
    })
}

/// Append `t=<millis>`, with `&` when the URL already has a query.
pub fn cache_busted(url: &str, millis: i64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}t={millis}")
}

pub fn view(config: &PictureConfig, feed: &PictureFeed, snapshot: &EntitySnapshot) -> PictureView {
    let status = non_empty(&config.entity)
        .map(|e| snapshot.get(e).map_or("UNAVAILABLE".to_string(), |s| s.state.to_uppercase()));

    PictureView {
        title: non_empty(&config.title).unwrap_or(DEFAULT_TITLE).to_string(),
        image_url: feed.image_url.clone(),
        loading: feed.loading,
        error: feed.error,
        caption: non_empty(&config.caption).map(str::to_string),
        status,
        captured: config.show_timestamp.then(|| {
            feed.last_refresh
                .format("%b %-d, %Y, %H:%M:%S")
                .to_string()
                .to_uppercase()
        }),
        can_refresh: config.can_refresh(),
    }
}
