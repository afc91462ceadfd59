//! Home Assistant endpoint addressing.
//!
//! Dashboards are configured with the address users type into a browser
//! (`http://homeassistant.local:8123`). The WebSocket API lives at
//! `/api/websocket` on the same host, and relative media paths such as
//! `entity_picture` resolve against the HTTP base.

use url::Url;

use muthur_core::prelude::*;

const WEBSOCKET_PATH: &str = "/api/websocket";

/// The two addresses derived from one configured URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    /// `ws(s)://host[:port]/api/websocket`
    pub websocket: Url,
    /// `http(s)://host[:port]/`
    pub base: Url,
}

impl Endpoint {
    /// Normalise a configured address.
    ///
    /// Accepts `http`, `https`, `ws` and `wss` schemes. Any path on the input
    /// is replaced; a trailing `/api/websocket` is accepted as-is.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::config("connection.url is empty"));
        }

        let parsed = Url::parse(trimmed)
            .map_err(|e| Error::config(format!("invalid connection.url '{trimmed}': {e}")))?;

        let (http_scheme, ws_scheme) = match parsed.scheme() {
            "http" | "ws" => ("http", "ws"),
            "https" | "wss" => ("https", "wss"),
            other => {
                return Err(Error::config(format!(
                    "unsupported scheme '{other}' in connection.url (expected http, https, ws or wss)"
                )))
            }
        };

        if parsed.host_str().is_none() {
            return Err(Error::config(format!("connection.url '{trimmed}' has no host")));
        }

        let base = with_scheme_and_path(&parsed, http_scheme, "/")?;
        let websocket = with_scheme_and_path(&parsed, ws_scheme, WEBSOCKET_PATH)?;

        Ok(Self { websocket, base })
    }

    /// Resolve a media path reported by Home Assistant.
    ///
    /// Absolute URLs pass through unchanged; anything else is joined onto
    /// the HTTP base.
    pub fn resolve_media(&self, path: &str) -> String {
        resolve_media_url(&self.base, path)
    }
}

/// Join `path` onto `base` unless it is already absolute.
pub fn resolve_media_url(base: &Url, path: &str) -> String {
    if Url::parse(path).is_ok() {
        return path.to_string();
    }
    match base.join(path) {
        Ok(url) => url.to_string(),
        Err(_) => path.to_string(),
    }
}

fn with_scheme_and_path(source: &Url, scheme: &str, path: &str) -> Result<Url> {
    let host = source
        .host_str()
        .ok_or_else(|| Error::config("connection.url has no host"))?;
    let authority = match source.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    Url::parse(&format!("{scheme}://{authority}{path}"))
        .map_err(|e| Error::config(format!("cannot build {scheme} url: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_url_becomes_ws() {
        let ep = Endpoint::parse("http://homeassistant.local:8123").unwrap();
        assert_eq!(ep.websocket.as_str(), "ws://homeassistant.local:8123/api/websocket");
        assert_eq!(ep.base.as_str(), "http://homeassistant.local:8123/");
    }

    #[test]
    fn test_https_url_becomes_wss() {
        let ep = Endpoint::parse("https://ha.example.org/lovelace/0").unwrap();
        assert_eq!(ep.websocket.as_str(), "wss://ha.example.org/api/websocket");
        assert_eq!(ep.base.as_str(), "https://ha.example.org/");
    }

    #[test]
    fn test_websocket_url_kept() {
        let ep = Endpoint::parse("ws://10.0.0.5:8123/api/websocket").unwrap();
        assert_eq!(ep.websocket.as_str(), "ws://10.0.0.5:8123/api/websocket");
        assert_eq!(ep.base.as_str(), "http://10.0.0.5:8123/");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(Endpoint::parse("").is_err());
        assert!(Endpoint::parse("ftp://ha.local").is_err());
        assert!(Endpoint::parse("not a url").is_err());
    }

    #[test]
    fn test_resolve_relative_media() {
        let ep = Endpoint::parse("http://ha.local:8123").unwrap();
        assert_eq!(
            ep.resolve_media("/api/camera_proxy/camera.hangar?token=abc"),
            "http://ha.local:8123/api/camera_proxy/camera.hangar?token=abc"
        );
    }

    #[test]
    fn test_resolve_absolute_media() {
        let ep = Endpoint::parse("http://ha.local:8123").unwrap();
        assert_eq!(
            ep.resolve_media("https://cdn.example.org/feed.jpg"),
            "https://cdn.example.org/feed.jpg"
        );
    }
}
