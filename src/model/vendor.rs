//! Vendor classification for modules.
//!
//! Detection is a path heuristic only: a module counts as vendor when its
//! defining file sits below a directory segment named exactly `vendor`. Other
//! third-party layouts (a `library/` tree, symlinked installs) are not
//! recognized.

use std::path::Path;

const VENDOR_SEGMENT: &str = "vendor";

/// Tri-state vendor flag. `Unknown` only exists until the first resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VendorStatus {
    #[default]
    Unknown,
    Vendor,
    NotVendor,
}

impl VendorStatus {
    pub fn from_hint(hint: Option<bool>) -> Self {
        match hint {
            Some(flag) => Self::from_bool(flag),
            None => VendorStatus::Unknown,
        }
    }

    pub fn from_bool(flag: bool) -> Self {
        if flag {
            VendorStatus::Vendor
        } else {
            VendorStatus::NotVendor
        }
    }

    pub fn resolved(self) -> Option<bool> {
        match self {
            VendorStatus::Unknown => None,
            VendorStatus::Vendor => Some(true),
            VendorStatus::NotVendor => Some(false),
        }
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, VendorStatus::Unknown)
    }
}

/// True when `path` has a `vendor` segment bounded by separators on both sides.
///
/// Both `/` and `\` count as separators regardless of host platform, so paths
/// recorded on Windows classify the same way everywhere.
pub fn path_is_vendor(path: &Path) -> bool {
    let raw = path.to_string_lossy();
    let segments: Vec<&str> = raw.split(['/', '\\']).collect();
    if segments.len() < 3 {
        return false;
    }
    segments[1..segments.len() - 1]
        .iter()
        .any(|segment| *segment == VENDOR_SEGMENT)
}
