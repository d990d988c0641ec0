//! In-memory module registry, optionally loaded from a JSON file.
//!
//! The registry file lists each module namespace and the file defining its
//! `Module` type. Loading is strict: the document must match the embedded
//! schema, carry the supported `schema_version`, and list each namespace once.

use crate::locator::ModuleLocator;
use crate::schema_loader::{EmbeddedSchema, validate_instance};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const REGISTRY_SCHEMA_VERSION: &str = "module_registry_v1";

static REGISTRY_SCHEMA: EmbeddedSchema = EmbeddedSchema::new(
    "module_registry",
    include_str!("../../schema/module_registry.schema.json"),
);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistryDocument {
    schema_version: String,
    modules: Vec<RegistryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One registry row: a namespace and its defining file.
struct RegistryEntry {
    namespace: String,
    file: PathBuf,
}

#[derive(Debug, Clone, Default)]
/// Namespace-keyed locator backed by a `BTreeMap` for stable iteration.
pub struct ModuleRegistry {
    modules: BTreeMap<String, PathBuf>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a registry file.
    ///
    /// Relative `file` entries are resolved against the registry's directory so
    /// a registry can travel with the tree it describes.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening registry {}", path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing registry {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let registry = Self::from_value(&value, base)
            .with_context(|| format!("loading registry {}", path.display()))?;
        info!(
            registry = %path.display(),
            modules = registry.len(),
            "loaded module registry"
        );
        Ok(registry)
    }

    /// Build a registry from an already-parsed document.
    pub fn from_value(value: &Value, base: &Path) -> Result<Self> {
        validate_instance(&REGISTRY_SCHEMA, value, "module registry")?;
        let document: RegistryDocument =
            serde_json::from_value(value.clone()).context("decoding module registry")?;
        validate_schema_version(&document.schema_version)?;

        let mut registry = Self::new();
        for entry in document.modules {
            if entry.namespace.trim().is_empty() {
                bail!("registry contains a module with an empty namespace");
            }
            if registry.modules.contains_key(&entry.namespace) {
                bail!("duplicate module namespace {}", entry.namespace);
            }
            let file = if entry.file.is_absolute() {
                entry.file
            } else {
                base.join(entry.file)
            };
            registry.register(entry.namespace, file);
        }
        Ok(registry)
    }

    /// Register (or replace) the defining file for a namespace.
    pub fn register(&mut self, namespace: impl Into<String>, file: impl Into<PathBuf>) {
        let namespace = namespace.into();
        let file = file.into();
        debug!(%namespace, file = %file.display(), "registering module");
        self.modules.insert(namespace, file);
    }

    pub fn get(&self, namespace: &str) -> Option<&Path> {
        self.modules.get(namespace).map(PathBuf::as_path)
    }

    /// Registered namespaces in stable order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleLocator for ModuleRegistry {
    fn defining_file(&self, namespace: &str) -> Option<PathBuf> {
        self.modules.get(namespace).cloned()
    }

    fn module_exists(&self, namespace: &str) -> bool {
        self.modules.contains_key(namespace)
    }
}

fn validate_schema_version(schema_version: &str) -> Result<()> {
    let expected = REGISTRY_SCHEMA
        .schema_version()?
        .unwrap_or(REGISTRY_SCHEMA_VERSION);
    if schema_version != expected {
        bail!("registry schema_version '{schema_version}' is not supported (expected '{expected}')");
    }
    Ok(())
}
