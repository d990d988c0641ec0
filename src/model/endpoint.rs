//! Endpoint descriptors held in a module's REST and RPC lists.
//!
//! The admin layer treats endpoints as opaque attribute maps. The map is the
//! only state an endpoint carries, so whatever was stored is exported again
//! unchanged; `controller_service_name` is just a read accessor over it.
//! List members that are neither identifiers nor maps are kept as raw values.

use crate::error::ModelError;
use crate::model::value_kind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const CONTROLLER_SERVICE_NAME: &str = "controller_service_name";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// One REST endpoint declared by a module.
pub struct RestEndpoint {
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// One RPC endpoint declared by a module.
pub struct RpcEndpoint {
    pub attributes: Map<String, Value>,
}

impl RestEndpoint {
    pub fn from_map(data: &Map<String, Value>) -> Self {
        Self {
            attributes: data.clone(),
        }
    }

    /// The controller service name, when present and a string.
    pub fn controller_service_name(&self) -> Option<&str> {
        service_name(&self.attributes)
    }

    pub fn to_map(&self) -> Map<String, Value> {
        self.attributes.clone()
    }
}

impl RpcEndpoint {
    /// Descriptor carrying only the controller service name.
    pub fn from_service_name(name: impl Into<String>) -> Self {
        let mut attributes = Map::new();
        attributes.insert(CONTROLLER_SERVICE_NAME.to_string(), Value::String(name.into()));
        Self { attributes }
    }

    pub fn from_map(data: &Map<String, Value>) -> Self {
        Self {
            attributes: data.clone(),
        }
    }

    pub fn controller_service_name(&self) -> Option<&str> {
        service_name(&self.attributes)
    }

    pub fn to_map(&self) -> Map<String, Value> {
        self.attributes.clone()
    }
}

fn service_name(attributes: &Map<String, Value>) -> Option<&str> {
    attributes.get(CONTROLLER_SERVICE_NAME).and_then(Value::as_str)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// REST list member: a bare identifier, a descriptor, or any other value.
///
/// REST lists are returned verbatim, so nothing here is ever upgraded.
pub enum RestEntry {
    Identifier(String),
    Endpoint(RestEndpoint),
    Raw(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// RPC list member: a bare controller service name, a descriptor, or any
/// other value. Raw values are never normalized.
pub enum RpcEntry {
    Identifier(String),
    Endpoint(RpcEndpoint),
    Raw(Value),
}

impl RestEntry {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(id) => RestEntry::Identifier(id.clone()),
            Value::Object(map) => RestEntry::Endpoint(RestEndpoint::from_map(map)),
            other => RestEntry::Raw(other.clone()),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RestEntry::Identifier(id) => Value::String(id.clone()),
            RestEntry::Endpoint(endpoint) => Value::Object(endpoint.to_map()),
            RestEntry::Raw(value) => value.clone(),
        }
    }
}

impl From<RestEndpoint> for RestEntry {
    fn from(endpoint: RestEndpoint) -> Self {
        RestEntry::Endpoint(endpoint)
    }
}

impl From<&str> for RestEntry {
    fn from(id: &str) -> Self {
        RestEntry::Identifier(id.to_string())
    }
}

impl RpcEntry {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(id) => RpcEntry::Identifier(id.clone()),
            Value::Object(map) => RpcEntry::Endpoint(RpcEndpoint::from_map(map)),
            other => RpcEntry::Raw(other.clone()),
        }
    }

    /// The descriptor, if this entry has already been normalized.
    pub fn as_endpoint(&self) -> Option<&RpcEndpoint> {
        match self {
            RpcEntry::Endpoint(endpoint) => Some(endpoint),
            RpcEntry::Identifier(_) | RpcEntry::Raw(_) => None,
        }
    }

    /// Upgrade a bare identifier to a descriptor; other entries are left as is.
    pub fn normalize(&mut self) {
        if let RpcEntry::Identifier(id) = self {
            let name = std::mem::take(id);
            *self = RpcEntry::Endpoint(RpcEndpoint::from_service_name(name));
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RpcEntry::Identifier(id) => Value::String(id.clone()),
            RpcEntry::Endpoint(endpoint) => Value::Object(endpoint.to_map()),
            RpcEntry::Raw(value) => value.clone(),
        }
    }
}

impl From<RpcEndpoint> for RpcEntry {
    fn from(endpoint: RpcEndpoint) -> Self {
        RpcEntry::Endpoint(endpoint)
    }
}

impl From<&str> for RpcEntry {
    fn from(id: &str) -> Self {
        RpcEntry::Identifier(id.to_string())
    }
}

/// Parse an untyped REST list. Only the list itself is type-checked.
pub(crate) fn rest_entries_from_value(value: &Value) -> Result<Vec<RestEntry>, ModelError> {
    let items = expect_array(value, "REST endpoints")?;
    Ok(items.iter().map(RestEntry::from_value).collect())
}

/// Parse an untyped RPC list. Only the list itself is type-checked.
pub(crate) fn rpc_entries_from_value(value: &Value) -> Result<Vec<RpcEntry>, ModelError> {
    let items = expect_array(value, "RPC endpoints")?;
    Ok(items.iter().map(RpcEntry::from_value).collect())
}

fn expect_array<'a>(value: &'a Value, field: &'static str) -> Result<&'a Vec<Value>, ModelError> {
    value.as_array().ok_or_else(|| ModelError::InvalidArgument {
        field,
        expected: "an array",
        received: value_kind(value).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rpc_identifier_normalizes_to_service_name() {
        let mut entry = RpcEntry::from("Foo\\V1\\Rpc\\Ping\\Controller");
        entry.normalize();
        let endpoint = entry.as_endpoint().expect("normalized");
        assert_eq!(
            endpoint.controller_service_name(),
            Some("Foo\\V1\\Rpc\\Ping\\Controller")
        );
        assert_eq!(endpoint.attributes.len(), 1);
    }

    #[test]
    fn normalize_leaves_descriptors_and_raw_values_untouched() {
        let original = RpcEntry::Endpoint(RpcEndpoint::from_map(
            json!({"controller_service_name": "Ping", "route_match": "/ping"})
                .as_object()
                .unwrap(),
        ));
        let mut entry = original.clone();
        entry.normalize();
        assert_eq!(entry, original);

        let mut raw = RpcEntry::Raw(json!(7));
        raw.normalize();
        assert_eq!(raw, RpcEntry::Raw(json!(7)));
        assert!(raw.as_endpoint().is_none());
    }

    #[test]
    fn endpoint_maps_export_exactly_as_stored() {
        for data in [
            json!({"controller_service_name": "Status", "http_methods": ["GET"]}),
            json!({"controller_service_name": 42}),
            json!({"route_match": "/x"}),
            json!({}),
        ] {
            let map = data.as_object().unwrap();
            assert_eq!(Value::Object(RestEndpoint::from_map(map).to_map()), data);
            assert_eq!(Value::Object(RpcEndpoint::from_map(map).to_map()), data);
        }
    }

    #[test]
    fn service_name_reads_only_strings() {
        let named = RestEndpoint::from_map(json!({"controller_service_name": "S"}).as_object().unwrap());
        let numeric = RestEndpoint::from_map(json!({"controller_service_name": 42}).as_object().unwrap());
        let missing = RestEndpoint::from_map(json!({"route_match": "/x"}).as_object().unwrap());
        assert_eq!(named.controller_service_name(), Some("S"));
        assert_eq!(numeric.controller_service_name(), None);
        assert_eq!(missing.controller_service_name(), None);
    }

    #[test]
    fn list_parsing_checks_only_the_list() {
        let err = rest_entries_from_value(&json!("not-a-list")).unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidArgument {
                field: "REST endpoints",
                expected: "an array",
                received: "string".into(),
            }
        );

        let rest = rest_entries_from_value(&json!([1, null, true, [2]])).unwrap();
        assert_eq!(
            rest,
            vec![
                RestEntry::Raw(json!(1)),
                RestEntry::Raw(Value::Null),
                RestEntry::Raw(json!(true)),
                RestEntry::Raw(json!([2])),
            ]
        );

        let rpc = rpc_entries_from_value(&json!(["Ping", 7])).unwrap();
        assert_eq!(rpc[0], RpcEntry::Identifier("Ping".into()));
        assert_eq!(rpc[1], RpcEntry::Raw(json!(7)));
    }

    #[test]
    fn untagged_serde_matches_mixed_shape() {
        let entries: Vec<RpcEntry> =
            serde_json::from_value(json!(["Ping", {"controller_service_name": "Pong"}, 3])).unwrap();
        assert_eq!(entries[0], RpcEntry::Identifier("Ping".into()));
        assert_eq!(
            entries[1].as_endpoint().and_then(RpcEndpoint::controller_service_name),
            Some("Pong")
        );
        assert_eq!(entries[2], RpcEntry::Raw(json!(3)));
        let back = serde_json::to_value(&entries).unwrap();
        assert_eq!(back, json!(["Ping", {"controller_service_name": "Pong"}, 3]));
    }
}
