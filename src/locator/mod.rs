//! Module locators: the injectable stand-in for runtime type reflection.
//!
//! A descriptor needs two answers about its namespace: does a module-defining
//! type exist, and which file defines it. Locators answer both without any
//! process-wide registry, so tests can swap in counting or fixed fakes.

pub mod registry;
pub mod source_tree;

pub use registry::{ModuleRegistry, REGISTRY_SCHEMA_VERSION};
pub use source_tree::SourceTreeLocator;

use std::path::PathBuf;
use std::sync::Arc;

/// Separator used in module namespaces.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Conventional name of the type every module namespace must define.
pub const MODULE_TYPE: &str = "Module";

/// Resolves module-defining types by namespace.
pub trait ModuleLocator: Send + Sync {
    /// File that defines `<namespace>\Module`, if the type can be found.
    fn defining_file(&self, namespace: &str) -> Option<PathBuf>;

    /// Whether `<namespace>\Module` exists.
    fn module_exists(&self, namespace: &str) -> bool {
        self.defining_file(namespace).is_some()
    }
}

/// Fully qualified name of the module-defining type for `namespace`.
pub fn module_type_name(namespace: &str) -> String {
    format!("{namespace}{NAMESPACE_SEPARATOR}{MODULE_TYPE}")
}

impl<L: ModuleLocator + ?Sized> ModuleLocator for Arc<L> {
    fn defining_file(&self, namespace: &str) -> Option<PathBuf> {
        (**self).defining_file(namespace)
    }

    fn module_exists(&self, namespace: &str) -> bool {
        (**self).module_exists(namespace)
    }
}

#[derive(Default)]
/// Tries each locator in order; the first one that knows the namespace wins.
pub struct ChainLocator {
    locators: Vec<Box<dyn ModuleLocator>>,
}

impl ChainLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, locator: impl ModuleLocator + 'static) {
        self.locators.push(Box::new(locator));
    }

    pub fn with(mut self, locator: impl ModuleLocator + 'static) -> Self {
        self.push(locator);
        self
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }
}

impl ModuleLocator for ChainLocator {
    fn defining_file(&self, namespace: &str) -> Option<PathBuf> {
        self.locators
            .iter()
            .find_map(|locator| locator.defining_file(namespace))
    }

    fn module_exists(&self, namespace: &str) -> bool {
        self.locators
            .iter()
            .any(|locator| locator.module_exists(namespace))
    }
}
