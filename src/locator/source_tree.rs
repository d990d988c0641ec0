//! Filesystem locator that finds module-defining files under source roots.
//!
//! For namespace `Acme\Status` (or `Acme/Status`) each root is searched for
//! `<root>/Acme/Status/<file>` and then `<root>/Acme.Status/<file>`, where
//! `<file>` defaults to `Module.php`. Roots are searched in the order given.
//! `.` and `..` segments never resolve.

use crate::locator::{ModuleLocator, NAMESPACE_SEPARATOR};
use crate::model::normalize_name;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODULE_FILE: &str = "Module.php";

#[derive(Debug, Clone)]
pub struct SourceTreeLocator {
    roots: Vec<PathBuf>,
    file_name: String,
}

impl SourceTreeLocator {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            file_name: DEFAULT_MODULE_FILE.to_string(),
        }
    }

    /// Override the module file name looked up in each candidate directory.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Every path checked for `namespace`, in search order.
    pub fn candidates(&self, namespace: &str) -> Vec<PathBuf> {
        let segments: Vec<&str> = namespace
            .split([NAMESPACE_SEPARATOR, '/'])
            .filter(|segment| !segment.is_empty())
            .collect();
        if segments.is_empty() || segments.iter().any(|s| is_traversal(s)) {
            return Vec::new();
        }
        let dotted = normalize_name(namespace);

        let mut candidates = Vec::new();
        for root in &self.roots {
            let nested = segments
                .iter()
                .fold(root.clone(), |dir, segment| dir.join(segment));
            candidates.push(nested.join(&self.file_name));
            if segments.len() > 1 {
                candidates.push(root.join(&dotted).join(&self.file_name));
            }
        }
        candidates
    }
}

fn is_traversal(segment: &str) -> bool {
    segment == "." || segment == ".." || Path::new(segment).is_absolute()
}

impl ModuleLocator for SourceTreeLocator {
    fn defining_file(&self, namespace: &str) -> Option<PathBuf> {
        self.candidates(namespace)
            .into_iter()
            .find(|candidate| candidate.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_cover_nested_and_dotted_layouts() {
        let locator = SourceTreeLocator::new(["/srv/app/module", "/srv/app/vendor"]);
        assert_eq!(
            locator.candidates("Acme\\Status"),
            vec![
                PathBuf::from("/srv/app/module/Acme/Status/Module.php"),
                PathBuf::from("/srv/app/module/Acme.Status/Module.php"),
                PathBuf::from("/srv/app/vendor/Acme/Status/Module.php"),
                PathBuf::from("/srv/app/vendor/Acme.Status/Module.php"),
            ]
        );
    }

    #[test]
    fn single_segment_namespace_has_one_candidate_per_root() {
        let locator = SourceTreeLocator::new(["/srv/app/module"]).with_file_name("module.rs");
        assert_eq!(
            locator.candidates("Status"),
            vec![PathBuf::from("/srv/app/module/Status/module.rs")]
        );
    }

    #[test]
    fn traversal_segments_are_never_searched() {
        let locator = SourceTreeLocator::new(["/srv/app/module"]);
        assert!(locator.candidates("..\\etc").is_empty());
        assert!(locator.candidates("Acme/../../etc").is_empty());
        assert!(locator.candidates("").is_empty());
    }

    #[test]
    fn slash_spelled_namespaces_match_backslash_ones() {
        let locator = SourceTreeLocator::new(["/srv/app/module"]);
        assert_eq!(
            locator.candidates("Acme/Status"),
            locator.candidates("Acme\\Status")
        );
    }
}
