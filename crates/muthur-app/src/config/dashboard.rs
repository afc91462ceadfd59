//! Dashboard loader for `dashboard.toml`

use std::path::{Path, PathBuf};

use serde_json::Value;

use muthur_core::prelude::*;

use super::types::{ConnectionSettings, Dashboard, DashboardFile, View};
use crate::registry::CardRegistry;

const APP_DIR: &str = "muthur";
const DASHBOARD_FILENAME: &str = "dashboard.toml";

/// `<config_dir>/muthur/dashboard.toml`
pub fn default_dashboard_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(DASHBOARD_FILENAME))
}

/// Read, parse and validate a dashboard file.
pub fn load_dashboard(path: &Path, registry: &CardRegistry) -> Result<Dashboard> {
    if !path.exists() {
        return Err(Error::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let dashboard = parse_dashboard(&content, registry)?;
    debug!(
        "Loaded dashboard from {:?}: {} views",
        path,
        dashboard.views.len()
    );
    Ok(dashboard)
}

/// Parse dashboard TOML and build every card through the registry.
///
/// Fails on the first card that does not validate, naming its view and
/// position.
pub fn parse_dashboard(content: &str, registry: &CardRegistry) -> Result<Dashboard> {
    let file: DashboardFile = toml::from_str(content)?;

    if file.views.is_empty() {
        return Err(Error::config_invalid("dashboard has no [[views]]"));
    }

    let views = file
        .views
        .into_iter()
        .enumerate()
        .map(|(index, view)| {
            let title = view
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| format!("VIEW {}", index + 1));
            let cards = view
                .cards
                .iter()
                .enumerate()
                .map(|(position, table)| {
                    registry.build(&toml_to_json(table)?).map_err(|e| match e {
                        Error::MissingField { card_type, message } => Error::MissingField {
                            card_type: format!("{title} card {}: {card_type}", position + 1),
                            message,
                        },
                        other => other,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(View {
                path: view
                    .path
                    .map(|p| p.trim_matches('/').to_string())
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(|| index.to_string()),
                columns: view.columns.max(1),
                title,
                cards,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Dashboard {
        connection: file.connection,
        ui: file.ui,
        watcher: file.watcher,
        views,
    })
}

/// Convert a TOML card table into the JSON mapping card validators read.
pub fn toml_to_json(value: &toml::Value) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Render a card's stub configuration as a `[[views.cards]]` TOML block.
pub fn stub_to_toml(stub: &Value) -> Result<String> {
    let body = toml::to_string(stub)
        .map_err(|e| Error::config(format!("cannot render stub as TOML: {e}")))?;
    Ok(format!("[[views.cards]]\n{body}"))
}

/// The access token: `token` if set, else the variable named by `token_env`.
pub fn resolve_token(connection: &ConnectionSettings) -> Result<String> {
    if let Some(token) = connection.token.as_deref().filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    match std::env::var(&connection.token_env) {
        Ok(token) if !token.is_empty() => Ok(token),
        _ => Err(Error::config(format!(
            "no access token: set connection.token or the {} environment variable",
            connection.token_env
        ))),
    }
}
