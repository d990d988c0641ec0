//! Data model for the API-first admin layer.
//!
//! The crate describes one pluggable module at a time: its dotted display name,
//! its namespace, whether it was installed from a vendor tree, and the REST and
//! RPC endpoints it declares. Type resolution is injected through
//! [`ModuleLocator`] so descriptors never depend on process-wide state; the
//! `module-info` helper wires a registry file and source roots together and
//! prints descriptors as JSON.

use serde_json::{Map, Value};

pub mod error;
pub mod locator;
pub mod model;
mod schema_loader;

pub use error::ModelError;
pub use locator::{
    ChainLocator, ModuleLocator, ModuleRegistry, SourceTreeLocator, module_type_name,
};
pub use model::{
    ModuleDescriptor, RestEndpoint, RestEntry, RpcEndpoint, RpcEntry, VendorStatus,
    derive_namespace, normalize_name, path_is_vendor,
};

/// Environment variable naming the default registry file for helpers.
pub const REGISTRY_ENV: &str = "APIFIRST_MODULE_REGISTRY";

/// Environment variable listing extra source roots (comma or space separated).
pub const SOURCE_ROOTS_ENV: &str = "APIFIRST_SOURCE_ROOTS";

/// Split comma- or whitespace-delimited configuration lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Accept either a namespace (`Acme\Status`) or a dotted name (`Acme.Status`).
///
/// Identities without a backslash but with dots are treated as display names
/// and converted back to namespaces.
pub fn namespace_from_identity(identity: &str) -> String {
    let trimmed = identity.trim();
    if trimmed.contains('\\') || !trimmed.contains('.') {
        trimmed.to_string()
    } else {
        derive_namespace(trimmed)
    }
}

/// Parse a populate payload, which must be a JSON object.
pub fn parse_populate_payload(raw: &str) -> anyhow::Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!(
            "populate payload must be a JSON object; received {}",
            model::value_kind(&other)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identities_accept_both_spellings() {
        assert_eq!(namespace_from_identity("Acme.Status"), "Acme\\Status");
        assert_eq!(namespace_from_identity(" Acme\\Status "), "Acme\\Status");
        assert_eq!(namespace_from_identity("Status"), "Status");
    }

    #[test]
    fn split_list_handles_commas_and_spaces() {
        assert_eq!(split_list("a, b  c,,d"), vec!["a", "b", "c", "d"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn populate_payload_must_be_object() {
        assert!(parse_populate_payload("{\"name\": \"x\"}").is_ok());
        let err = parse_populate_payload("[1]").unwrap_err();
        assert!(err.to_string().contains("received array"));
        assert!(parse_populate_payload("{").is_err());
    }
}
