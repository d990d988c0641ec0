//! Shared JSON Schema helpers for documents the admin layer reads from disk.
//!
//! Schemas are embedded at compile time and parsed once. Validation reports
//! every violation joined by newlines so a broken file can be fixed in one
//! pass.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::sync::OnceLock;

/// A schema embedded in the binary plus its parsed, process-lifetime value.
pub(crate) struct EmbeddedSchema {
    pub name: &'static str,
    source: &'static str,
    parsed: OnceLock<Value>,
}

impl EmbeddedSchema {
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self {
            name,
            source,
            parsed: OnceLock::new(),
        }
    }

    fn value(&'static self) -> Result<&'static Value> {
        if let Some(value) = self.parsed.get() {
            return Ok(value);
        }
        let value: Value = serde_json::from_str(self.source)
            .with_context(|| format!("parsing embedded schema {}", self.name))?;
        Ok(self.parsed.get_or_init(|| value))
    }

    /// The `schema_version` const the schema pins, if any.
    pub fn schema_version(&'static self) -> Result<Option<&'static str>> {
        Ok(self
            .value()?
            .pointer("/properties/schema_version/const")
            .and_then(Value::as_str))
    }

    pub fn compile(&'static self) -> Result<JSONSchema> {
        let value = self.value()?;
        JSONSchema::compile(value).map_err(|err| anyhow!("compiling schema {}: {err}", self.name))
    }
}

/// Validate `instance` against `schema`, failing with every error message.
pub(crate) fn validate_instance(
    schema: &'static EmbeddedSchema,
    instance: &Value,
    label: &str,
) -> Result<()> {
    let compiled = schema.compile()?;
    if let Err(errors) = compiled.validate(instance) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!("{label} failed {} validation:\n{details}", schema.name);
    }
    Ok(())
}
