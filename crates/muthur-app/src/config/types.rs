//! Dashboard file types

use serde::{Deserialize, Serialize};

use crate::cards::Card;

pub const DEFAULT_TOKEN_ENV: &str = "HASS_TOKEN";

/// `dashboard.toml` as written by the user, before card validation.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardFile {
    pub connection: ConnectionSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub watcher: WatcherSettings,

    #[serde(default)]
    pub views: Vec<ViewFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewFile {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_columns")]
    pub columns: u16,
    /// Card tables, validated by the registry.
    #[serde(default)]
    pub cards: Vec<toml::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConnectionSettings {
    /// Home Assistant URL, `http(s)://` or `ws(s)://`.
    pub url: String,

    /// Literal access token. Wins over `token_env`.
    #[serde(default)]
    pub token: Option<String>,

    /// Environment variable holding the token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconStyle {
    #[default]
    Unicode,
    Ascii,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    #[serde(default)]
    pub icons: IconStyle,

    /// Ask before quitting with `q`.
    #[serde(default)]
    pub confirm_quit: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            icons: IconStyle::Unicode,
            confirm_quit: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WatcherSettings {
    /// Reload the dashboard when its file changes.
    #[serde(default = "default_true")]
    pub auto_reload: bool,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            auto_reload: true,
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

fn default_columns() -> u16 {
    2
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Validated dashboard
// ─────────────────────────────────────────────────────────────────────────────

/// A dashboard whose cards have all passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub connection: ConnectionSettings,
    pub ui: UiSettings,
    pub watcher: WatcherSettings,
    pub views: Vec<View>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub title: String,
    /// Navigation target; defaults to the view's position.
    pub path: String,
    /// Grid columns, at least 1.
    pub columns: u16,
    pub cards: Vec<Card>,
}

impl Dashboard {
    pub fn view(&self, index: usize) -> Option<&View> {
        self.views.get(index)
    }

    /// Index of the view a navigation path points at.
    ///
    /// Only the last segment of the path is compared, so `/lovelace/deck-b`,
    /// `deck-b` and `/deck-b` all select the view with path `deck-b`.
    pub fn find_view(&self, path: &str) -> Option<usize> {
        let wanted = path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(path);
        if wanted.is_empty() {
            return None;
        }
        self.views.iter().position(|v| v.path == wanted)
    }
}
