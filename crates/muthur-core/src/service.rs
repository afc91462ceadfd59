//! Service calls: the only way the dashboard changes entity state

use serde::Serialize;
use serde_json::{Map, Value};

use crate::entity::entity_domain;

/// A named, parameterised request sent to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub service_data: Map<String, Value>,
}

impl ServiceCall {
    pub fn new(domain: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            service: service.into(),
            service_data: Map::new(),
        }
    }

    /// Call `service` in the entity's own domain, targeting that entity.
    pub fn for_entity(entity_id: &str, service: impl Into<String>) -> Self {
        Self::new(entity_domain(entity_id), service).with_entity(entity_id)
    }

    /// Parse a `domain.service` pair. Returns `None` without a `.`.
    pub fn parse(qualified: &str) -> Option<Self> {
        let (domain, service) = qualified.split_once('.')?;
        if domain.is_empty() || service.is_empty() {
            return None;
        }
        Some(Self::new(domain, service))
    }

    pub fn with_entity(self, entity_id: &str) -> Self {
        self.with("entity_id", entity_id)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.service_data.insert(key.into(), value.into());
        self
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.service_data.extend(data);
        self
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.service_data.get("entity_id").and_then(Value::as_str)
    }

    /// `domain.service`, for logs and status lines.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.domain, self.service)
    }
}

impl std::fmt::Display for ServiceCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.entity_id() {
            Some(entity) => write!(f, "{}.{} -> {}", self.domain, self.service, entity),
            None => write!(f, "{}.{}", self.domain, self.service),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_for_entity_uses_entity_domain() {
        let call = ServiceCall::for_entity("switch.airlock", "toggle");
        assert_eq!(call.domain, "switch");
        assert_eq!(call.service, "toggle");
        assert_eq!(call.entity_id(), Some("switch.airlock"));
    }

    #[test]
    fn test_parse_qualified_name() {
        let call = ServiceCall::parse("script.self_destruct").unwrap();
        assert_eq!(call.domain, "script");
        assert_eq!(call.service, "self_destruct");
        assert!(ServiceCall::parse("no_dot").is_none());
        assert!(ServiceCall::parse(".service").is_none());
    }

    #[test]
    fn test_with_data_merges() {
        let mut data = Map::new();
        data.insert("brightness".into(), json!(128));
        let call = ServiceCall::for_entity("light.bridge", "turn_on").with_data(data);
        assert_eq!(call.service_data.get("brightness"), Some(&json!(128)));
        assert_eq!(call.entity_id(), Some("light.bridge"));
    }

    #[test]
    fn test_display() {
        let call = ServiceCall::for_entity("light.bridge", "turn_off");
        assert_eq!(call.to_string(), "light.turn_off -> light.bridge");
        assert_eq!(ServiceCall::new("homeassistant", "restart").to_string(), "homeassistant.restart");
    }
}
