//! Data model for admin-layer module descriptors.
//!
//! `ModuleDescriptor` is the record the admin API renders for each module;
//! endpoint types are opaque attribute bags it owns. The free helpers here are
//! the loose-typing rules used when descriptors are filled from untyped JSON.

pub mod endpoint;
pub mod module;
pub mod vendor;

pub use endpoint::{RestEndpoint, RestEntry, RpcEndpoint, RpcEntry};
pub use module::ModuleDescriptor;
pub use vendor::{VendorStatus, path_is_vendor};

use serde_json::Value;

/// Dotted display name for a namespace: `Acme\Status` becomes `Acme.Status`.
///
/// Forward slashes are treated as separators too, for hosts that spell
/// namespaces as paths.
pub fn normalize_name(namespace: &str) -> String {
    namespace.replace(['\\', '/'], ".")
}

/// Namespace for a dotted display name: `Acme.Status` becomes `Acme\Status`.
pub fn derive_namespace(name: &str) -> String {
    name.replace('.', "\\")
}

/// Loose boolean coercion for untyped flags.
///
/// `false`, `null`, zero, `""`, `"0"` and empty arrays or objects are false;
/// everything else is true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !(text.is_empty() || text == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Loose text coercion for untyped names.
///
/// Strings pass through, `true` becomes `"1"`, `false` and `null` become `""`,
/// numbers use their JSON spelling, and arrays or objects become compact JSON
/// text. Never fails.
pub fn loose_string(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        compound => compound.to_string(),
    }
}

/// Short type label for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_f64() => "double",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
