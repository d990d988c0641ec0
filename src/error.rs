//! Error taxonomy for the module data model.
//!
//! Both variants are caller errors surfaced immediately; nothing here is
//! retried. File-backed helpers (registry loading, schema compilation) use
//! `anyhow` instead because their failures carry file context.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// No module-defining type resolves for the namespace.
    #[error("Invalid module \"{namespace}\"; no Module class exists for that module")]
    InvalidModule { namespace: String },

    /// A populate value had the wrong shape for its key.
    #[error("{field} must be {expected}; received \"{received}\"")]
    InvalidArgument {
        field: &'static str,
        expected: &'static str,
        received: String,
    },
}

impl ModelError {
    pub(crate) fn invalid_module(namespace: &str) -> Self {
        ModelError::InvalidModule {
            namespace: namespace.to_string(),
        }
    }
}
