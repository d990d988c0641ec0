use anyhow::{Context, Result};
use apifirst_admin::{ModuleLocator, ModuleRegistry};
use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Registry wrapper that counts how often the defining file is looked up.
pub struct CountingLocator {
    inner: ModuleRegistry,
    lookups: AtomicUsize,
}

impl CountingLocator {
    pub fn new(inner: ModuleRegistry) -> Arc<Self> {
        Arc::new(Self {
            inner,
            lookups: AtomicUsize::new(0),
        })
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ModuleLocator for CountingLocator {
    fn defining_file(&self, namespace: &str) -> Option<PathBuf> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.defining_file(namespace)
    }

    fn module_exists(&self, namespace: &str) -> bool {
        self.inner.module_exists(namespace)
    }
}

/// Two local modules and one vendor module, the layout most tests use.
pub fn sample_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register("Acme\\Status", "/srv/app/module/Status/Module.php");
    registry.register("Acme\\Inventory", "/srv/app/module/Inventory/Module.php");
    registry.register("Acme\\Billing", "/srv/app/vendor/acme/billing/Module.php");
    registry
}

pub fn object(value: Value) -> Map<String, Value> {
    value
        .as_object()
        .cloned()
        .expect("fixture must be a JSON object")
}

/// Write a registry document under `dir` and return its path.
pub fn write_registry(dir: &Path, modules: &[(&str, &str)]) -> Result<PathBuf> {
    let entries: Vec<Value> = modules
        .iter()
        .map(|(namespace, file)| json!({"namespace": namespace, "file": file}))
        .collect();
    let doc = json!({"schema_version": "module_registry_v1", "modules": entries});
    let path = dir.join("modules.json");
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Create an empty module file at `root/relative`.
pub fn touch_module(root: &Path, relative: &str) -> Result<PathBuf> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, "<?php\n")?;
    Ok(path)
}
