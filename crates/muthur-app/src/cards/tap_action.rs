//! Button tap actions.

use serde::Deserialize;
use serde_json::{Map, Value};

use muthur_core::ServiceCall;

use crate::host::HostRequest;

/// `tap_action` table as written in the dashboard file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TapActionConfig {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub navigation_path: Option<String>,
    #[serde(default)]
    pub url_path: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub service_data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TapAction {
    Toggle,
    Navigate { path: Option<String> },
    OpenUrl { url: Option<String> },
    ShowDetail { entity: Option<String> },
    CallService {
        service: Option<String>,
        service_data: Map<String, Value>,
    },
    /// Any other action name: that service in the entity's own domain.
    EntityService { service: String },
    None,
}

impl From<&TapActionConfig> for TapAction {
    fn from(config: &TapActionConfig) -> Self {
        let name = config
            .action
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or("toggle");

        match name {
            "toggle" => TapAction::Toggle,
            "navigate" => TapAction::Navigate {
                path: non_empty(&config.navigation_path),
            },
            "url" => TapAction::OpenUrl {
                url: non_empty(&config.url_path),
            },
            "more-info" => TapAction::ShowDetail {
                entity: non_empty(&config.entity),
            },
            "call-service" => TapAction::CallService {
                service: non_empty(&config.service),
                service_data: config.service_data.clone(),
            },
            "none" => TapAction::None,
            other => TapAction::EntityService {
                service: other.to_string(),
            },
        }
    }
}

impl TapAction {
    /// Turn the action into a host request.
    ///
    /// `entity` is the entity of the button the action is attached to.
    /// Returns `None` when the action lacks what it needs (no path, no
    /// entity, ...) or is `none`.
    pub fn resolve(&self, entity: Option<&str>) -> Option<HostRequest> {
        let entity = entity.filter(|e| !e.is_empty());
        match self {
            TapAction::Navigate { path } => path.clone().map(|path| HostRequest::Navigate { path }),
            TapAction::OpenUrl { url } => url.clone().map(|url| HostRequest::OpenUrl { url }),
            TapAction::ShowDetail { entity: own } => own
                .as_deref()
                .or(entity)
                .map(|entity_id| HostRequest::ShowDetail {
                    entity_id: entity_id.to_string(),
                }),
            TapAction::CallService {
                service,
                service_data,
            } => service
                .as_deref()
                .and_then(ServiceCall::parse)
                .map(|call| HostRequest::CallService(call.with_data(service_data.clone()))),
            TapAction::Toggle => {
                entity.map(|e| HostRequest::CallService(ServiceCall::for_entity(e, "toggle")))
            }
            TapAction::EntityService { service } => entity
                .map(|e| HostRequest::CallService(ServiceCall::for_entity(e, service.as_str()))),
            TapAction::None => None,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn action(value: Value) -> TapAction {
        let config: TapActionConfig = serde_json::from_value(value).unwrap();
        TapAction::from(&config)
    }

    #[test]
    fn test_missing_action_is_toggle() {
        assert_eq!(action(json!({})), TapAction::Toggle);
        assert_eq!(
            action(json!({})).resolve(Some("switch.airlock")),
            Some(HostRequest::CallService(ServiceCall::for_entity(
                "switch.airlock",
                "toggle"
            )))
        );
    }

    #[test]
    fn test_toggle_without_entity_does_nothing() {
        assert_eq!(TapAction::Toggle.resolve(None), None);
    }

    #[test]
    fn test_navigate_and_url() {
        assert_eq!(
            action(json!({"action": "navigate", "navigation_path": "/lovelace/engineering"}))
                .resolve(None),
            Some(HostRequest::Navigate {
                path: "/lovelace/engineering".into()
            })
        );
        assert_eq!(action(json!({"action": "navigate"})).resolve(None), None);
        assert_eq!(
            action(json!({"action": "url", "url_path": "https://weyland.example"})).resolve(None),
            Some(HostRequest::OpenUrl {
                url: "https://weyland.example".into()
            })
        );
    }

    #[test]
    fn test_more_info_prefers_own_entity() {
        let own = action(json!({"action": "more-info", "entity": "sensor.o2"}));
        assert_eq!(
            own.resolve(Some("light.bridge")),
            Some(HostRequest::ShowDetail {
                entity_id: "sensor.o2".into()
            })
        );
        let fallback = action(json!({"action": "more-info"}));
        assert_eq!(
            fallback.resolve(Some("light.bridge")),
            Some(HostRequest::ShowDetail {
                entity_id: "light.bridge".into()
            })
        );
    }

    #[test]
    fn test_call_service_with_data() {
        let tap = action(json!({
            "action": "call-service",
            "service": "script.purge_airlock",
            "service_data": {"deck": 3}
        }));
        match tap.resolve(None) {
            Some(HostRequest::CallService(call)) => {
                assert_eq!(call.domain, "script");
                assert_eq!(call.service, "purge_airlock");
                assert_eq!(call.service_data.get("deck"), Some(&json!(3)));
            }
            other => panic!("Expected CallService, got {:?}", other),
        }
        assert_eq!(action(json!({"action": "call-service"})).resolve(None), None);
    }

    #[test]
    fn test_unknown_action_calls_entity_domain_service() {
        let tap = action(json!({"action": "turn_on"}));
        assert_eq!(
            tap,
            TapAction::EntityService {
                service: "turn_on".into()
            }
        );
        assert_eq!(
            tap.resolve(Some("light.galley")),
            Some(HostRequest::CallService(ServiceCall::for_entity(
                "light.galley",
                "turn_on"
            )))
        );
    }

    #[test]
    fn test_none_does_nothing() {
        assert_eq!(action(json!({"action": "none"})).resolve(Some("light.x")), None);
    }
}
