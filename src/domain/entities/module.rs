//! Module entity - a template module pinned to a concrete version

use std::sync::Arc;

use crate::domain::entities::ModuleManifest;
use crate::domain::value_objects::Version;

/// URI scheme of modules replaced by a local directory.
pub const LOCAL_SCHEME: &str = "file://";

/// The default fetch URI of a module: `https://<import-path>`.
pub fn default_uri(name: &str) -> String {
    format!("https://{}", name)
}

/// A module pinned to the version chosen for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: String,
    uri: String,
    version: Version,
}

impl Module {
    pub fn new(name: impl Into<String>, uri: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            version,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Whether the version is a moving reference (branch or local directory).
    pub fn is_mutable(&self) -> bool {
        self.version.mutable
    }

    pub fn is_local(&self) -> bool {
        self.uri.starts_with(LOCAL_SCHEME)
    }
}

/// A resolved module together with the manifest fetched for its version.
#[derive(Debug, Clone)]
pub struct ResolvedModule {
    pub module: Module,
    pub manifest: Arc<ModuleManifest>,
}

impl ResolvedModule {
    pub fn name(&self) -> &str {
        self.module.name()
    }
}
