//! The module descriptor rendered by the admin API.
//!
//! A descriptor is created for a namespace that resolves to a module-defining
//! type, optionally refilled from an untyped map (`populate`), and exported back
//! to one (`to_map`). Two fields are computed lazily and cached on first read:
//! the vendor flag and the normalized RPC list. Both accessors take `&mut self`,
//! so sharing a descriptor across threads requires the caller's own lock.

use crate::error::ModelError;
use crate::locator::{ModuleLocator, module_type_name};
use crate::model::endpoint::{
    RestEntry, RpcEndpoint, RpcEntry, rest_entries_from_value, rpc_entries_from_value,
};
use crate::model::vendor::{VendorStatus, path_is_vendor};
use crate::model::{loose_string, normalize_name, truthy};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct ModuleDescriptor {
    name: String,
    namespace: String,
    vendor: VendorStatus,
    rest_endpoints: Vec<RestEntry>,
    rpc_endpoints: Vec<RpcEntry>,
    locator: Arc<dyn ModuleLocator>,
}

/// Field changes collected from one `populate` call before any are applied.
#[derive(Default)]
struct PendingChanges {
    name: Option<String>,
    namespace: Option<String>,
    vendor: Option<bool>,
    rest: Option<Vec<RestEntry>>,
    rpc: Option<Vec<RpcEntry>>,
}

impl ModuleDescriptor {
    /// Describe the module at `namespace`.
    ///
    /// Fails with [`ModelError::InvalidModule`] when the locator cannot resolve
    /// `<namespace>\Module`. `vendor_hint` seeds the vendor flag; `None` leaves
    /// it to path detection on first read.
    pub fn new(
        locator: Arc<dyn ModuleLocator>,
        namespace: impl Into<String>,
        rest_endpoints: Vec<RestEntry>,
        rpc_endpoints: Vec<RpcEntry>,
        vendor_hint: Option<bool>,
    ) -> Result<Self, ModelError> {
        let namespace = namespace.into();
        if !locator.module_exists(&namespace) {
            return Err(ModelError::invalid_module(&namespace));
        }
        Ok(Self {
            name: normalize_name(&namespace),
            namespace,
            vendor: VendorStatus::from_hint(vendor_hint),
            rest_endpoints,
            rpc_endpoints,
            locator,
        })
    }

    /// Descriptor with no endpoints and an undetermined vendor flag.
    pub fn for_namespace(
        locator: Arc<dyn ModuleLocator>,
        namespace: impl Into<String>,
    ) -> Result<Self, ModelError> {
        Self::new(locator, namespace, Vec::new(), Vec::new(), None)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Current vendor state without triggering detection.
    pub fn vendor_status(&self) -> VendorStatus {
        self.vendor
    }

    /// Whether the module comes from a vendor tree.
    ///
    /// The first call on an undetermined descriptor runs path detection through
    /// the locator; the result is cached and never recomputed.
    pub fn is_vendor(&mut self) -> bool {
        self.resolve_vendor_status();
        self.vendor.resolved().unwrap_or(false)
    }

    fn resolve_vendor_status(&mut self) {
        if !self.vendor.is_unknown() {
            return;
        }
        self.vendor = VendorStatus::from_bool(self.determine_vendor_status());
    }

    fn determine_vendor_status(&self) -> bool {
        match self.locator.defining_file(&self.namespace) {
            Some(path) => {
                let vendor = path_is_vendor(&path);
                debug!(
                    module_type = %module_type_name(&self.namespace),
                    file = %path.display(),
                    vendor,
                    "determined vendor status"
                );
                vendor
            }
            None => {
                warn!(
                    module_type = %module_type_name(&self.namespace),
                    "module-defining file not found; treating module as non-vendor"
                );
                false
            }
        }
    }

    /// REST entries exactly as stored.
    pub fn rest_endpoints(&self) -> &[RestEntry] {
        &self.rest_endpoints
    }

    /// RPC endpoints with every bare identifier upgraded to a descriptor.
    ///
    /// The whole list is normalized in place and kept that way, so repeated
    /// calls are no-ops beyond the first. Raw members (numbers, `null`, nested
    /// lists) have no descriptor form and are skipped here; they stay in
    /// [`ModuleDescriptor::rpc_entries`] and in the exported map.
    pub fn rpc_endpoints(&mut self) -> Vec<&RpcEndpoint> {
        self.rpc_entries()
            .iter()
            .filter_map(RpcEntry::as_endpoint)
            .collect()
    }

    /// The full normalized RPC list, raw members included, in stored order.
    pub fn rpc_entries(&mut self) -> &[RpcEntry] {
        self.rpc_endpoints.iter_mut().for_each(RpcEntry::normalize);
        &self.rpc_endpoints
    }

    /// Bulk-assign fields from an untyped map.
    ///
    /// Keys match case-insensitively: `module`/`name`, `namespace`,
    /// `isvendor`/`is_vendor`, `rest`, `rpc`. Unknown keys are ignored. Setting
    /// `name` or `namespace` never re-derives the other. Names take any value,
    /// cast to text the loose way (see [`loose_string`]); only `rest` and `rpc`
    /// are type-checked, and both are checked before any field changes, so a
    /// failed call leaves the descriptor untouched. When two keys collapse to
    /// the same field (`NAME` and `name`), the later one in payload order wins.
    pub fn populate(&mut self, data: &Map<String, Value>) -> Result<(), ModelError> {
        let mut pending = PendingChanges::default();
        for (key, value) in data {
            match key.to_ascii_lowercase().as_str() {
                "module" | "name" => pending.name = Some(loose_string(value)),
                "namespace" => pending.namespace = Some(loose_string(value)),
                "isvendor" | "is_vendor" => pending.vendor = Some(truthy(value)),
                "rest" => pending.rest = Some(rest_entries_from_value(value)?),
                "rpc" => pending.rpc = Some(rpc_entries_from_value(value)?),
                _ => {}
            }
        }
        self.apply(pending);
        Ok(())
    }

    fn apply(&mut self, pending: PendingChanges) {
        if let Some(name) = pending.name {
            self.name = name;
        }
        if let Some(namespace) = pending.namespace {
            self.namespace = namespace;
        }
        if let Some(vendor) = pending.vendor {
            self.vendor = VendorStatus::from_bool(vendor);
        }
        if let Some(rest) = pending.rest {
            self.rest_endpoints = rest;
        }
        if let Some(rpc) = pending.rpc {
            self.rpc_endpoints = rpc;
        }
    }

    /// Export as `{name, namespace, is_vendor, rest, rpc}`.
    ///
    /// Resolves the vendor flag and normalizes the RPC list as a side effect.
    pub fn to_map(&mut self) -> Map<String, Value> {
        let is_vendor = self.is_vendor();
        let rpc: Vec<Value> = self.rpc_entries().iter().map(RpcEntry::to_value).collect();
        let rest: Vec<Value> = self.rest_endpoints.iter().map(RestEntry::to_value).collect();

        let mut map = Map::new();
        map.insert("name".into(), Value::String(self.name.clone()));
        map.insert("namespace".into(), Value::String(self.namespace.clone()));
        map.insert("is_vendor".into(), Value::Bool(is_vendor));
        map.insert("rest".into(), Value::Array(rest));
        map.insert("rpc".into(), Value::Array(rpc));
        map
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("vendor", &self.vendor)
            .field("rest_endpoints", &self.rest_endpoints)
            .field("rpc_endpoints", &self.rpc_endpoints)
            .finish_non_exhaustive()
    }
}
