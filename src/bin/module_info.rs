//! Print admin descriptors for one or more modules as JSON.
//!
//! Modules are resolved through a registry file (`--registry` or
//! `APIFIRST_MODULE_REGISTRY`) and any source roots (`--source-root` or
//! `APIFIRST_SOURCE_ROOTS`). An optional `--populate` object is applied to every
//! descriptor before export. Output is a JSON array on stdout; logs go to
//! stderr and honor `RUST_LOG`.

use anyhow::{Context, Result, bail};
use apifirst_admin::{
    ChainLocator, ModuleDescriptor, ModuleLocator, ModuleRegistry, REGISTRY_ENV,
    SOURCE_ROOTS_ENV, SourceTreeLocator, namespace_from_identity, parse_populate_payload,
    split_list,
};
use serde_json::{Map, Value};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let args = CliArgs::parse_from(env::args_os().skip(1))?.with_env_defaults();
    let locator = build_locator(&args)?;

    let mut rendered = Vec::with_capacity(args.modules.len());
    for identity in &args.modules {
        let namespace = namespace_from_identity(identity);
        debug!(%identity, %namespace, "describing module");
        let mut module = ModuleDescriptor::for_namespace(Arc::clone(&locator), namespace)?;
        if let Some(payload) = &args.populate {
            module
                .populate(payload)
                .with_context(|| format!("populating {identity}"))?;
        }
        rendered.push(Value::Object(module.to_map()));
    }

    println!("{}", serde_json::to_string_pretty(&Value::Array(rendered))?);
    Ok(())
}

fn build_locator(args: &CliArgs) -> Result<Arc<dyn ModuleLocator>> {
    let mut chain = ChainLocator::new();
    if let Some(path) = &args.registry {
        let registry = ModuleRegistry::load(path)?;
        debug!(
            namespaces = ?registry.namespaces().collect::<Vec<_>>(),
            "registry modules"
        );
        chain.push(registry);
    }
    if !args.source_roots.is_empty() {
        let tree = SourceTreeLocator::new(args.source_roots.iter().cloned());
        debug!(roots = ?tree.roots(), "source roots");
        chain.push(tree);
    }
    if chain.is_empty() {
        bail!("no module sources configured; pass --registry or --source-root (or set {REGISTRY_ENV})");
    }
    Ok(Arc::new(chain))
}

#[derive(Debug, Default)]
struct CliArgs {
    registry: Option<PathBuf>,
    source_roots: Vec<PathBuf>,
    populate: Option<Map<String, Value>>,
    modules: Vec<String>,
}

impl CliArgs {
    fn parse_from(args: impl IntoIterator<Item = OsString>) -> Result<Self> {
        let mut args = args.into_iter();
        let mut parsed = CliArgs::default();

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow::anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--registry" => {
                    if parsed.registry.is_some() {
                        bail!("--registry may only be provided once");
                    }
                    parsed.registry = Some(PathBuf::from(next_value(&mut args, "--registry")?));
                }
                "--source-root" => {
                    let root = next_value(&mut args, "--source-root")?;
                    parsed.source_roots.push(PathBuf::from(root));
                }
                "--populate" => {
                    let raw = next_value(&mut args, "--populate")?;
                    let payload = parse_populate_payload(&raw)
                        .with_context(|| format!("invalid JSON for --populate: {raw}"))?;
                    parsed.populate = Some(payload);
                }
                "--help" | "-h" => {
                    print!("{}", usage());
                    std::process::exit(0);
                }
                flag if flag.starts_with("--") => bail!("unknown flag: {flag}"),
                module => parsed.modules.push(module.to_string()),
            }
        }

        if parsed.modules.is_empty() {
            bail!("at least one module is required\n{}", usage());
        }
        Ok(parsed)
    }

    /// Fill unset sources from the environment.
    fn with_env_defaults(mut self) -> Self {
        if self.registry.is_none() {
            self.registry = env::var_os(REGISTRY_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from);
        }
        if self.source_roots.is_empty() {
            if let Ok(raw) = env::var(SOURCE_ROOTS_ENV) {
                self.source_roots = split_list(&raw).into_iter().map(PathBuf::from).collect();
            }
        }
        self
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow::anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: module-info [--registry FILE] [--source-root DIR]... [--populate JSON] MODULE...\n\
MODULE is a namespace (Acme\\Status) or dotted name (Acme.Status). Prints a JSON array of module descriptors.\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os_args(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn parses_sources_modules_and_payload() {
        let args = CliArgs::parse_from(os_args(&[
            "--registry",
            "modules.json",
            "--source-root",
            "module",
            "--source-root",
            "vendor",
            "--populate",
            "{\"is_vendor\": true}",
            "Acme.Status",
            "Acme\\Billing",
        ]))
        .unwrap();
        assert_eq!(args.registry, Some(PathBuf::from("modules.json")));
        assert_eq!(args.source_roots.len(), 2);
        assert_eq!(args.modules, vec!["Acme.Status", "Acme\\Billing"]);
        assert_eq!(
            args.populate.unwrap().get("is_vendor"),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn rejects_missing_modules_and_unknown_flags() {
        assert!(CliArgs::parse_from(os_args(&["--registry", "r.json"])).is_err());
        assert!(CliArgs::parse_from(os_args(&["--bogus", "Acme"])).is_err());
        assert!(CliArgs::parse_from(os_args(&["--populate", "[]", "Acme"])).is_err());
        assert!(CliArgs::parse_from(os_args(&["Acme", "--registry"])).is_err());
    }
}
