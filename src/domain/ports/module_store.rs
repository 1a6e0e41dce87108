//! ModuleStore port - fetches module content for a resolved version
//!
//! The store owns fetching and caching a module's checkout. The resolver only
//! ever asks for manifests; the rendering stage asks for the filesystem.

use std::path::{Path, PathBuf};

use crate::domain::entities::ModuleManifest;
use crate::domain::value_objects::{CancelToken, Version};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{uri}@{version} was not found")]
    NotFound { uri: String, version: String },

    #[error("invalid manifest in {uri}@{version}: {message}")]
    InvalidManifest {
        uri: String,
        version: String,
        message: String,
    },

    #[error("failed to read {uri}: {message}")]
    Io { uri: String, message: String },

    #[error("unsupported module URI: {uri}")]
    Unsupported { uri: String },

    #[error("fetch cancelled")]
    Cancelled,
}

/// A module checkout on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFs {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl ModuleFs {
    pub fn new(root: PathBuf, files: Vec<PathBuf>) -> Self {
        Self { root, files }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Template files, relative to `root`, in sorted order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

pub trait ModuleStore: Send + Sync {
    /// Fetch and parse the manifest of `uri` at `version`.
    fn manifest(
        &self,
        ctx: &CancelToken,
        uri: &str,
        version: &Version,
    ) -> Result<ModuleManifest, StoreError>;

    /// Materialize the module's files.
    fn filesystem(
        &self,
        ctx: &CancelToken,
        uri: &str,
        version: &Version,
    ) -> Result<ModuleFs, StoreError>;
}

/// Source of release notes shown before a major-version upgrade.
pub trait ReleaseNotesSource: Send + Sync {
    fn release_notes(
        &self,
        ctx: &CancelToken,
        uri: &str,
        version: &Version,
    ) -> Result<String, StoreError>;
}

/// Release notes source for contexts that never show notes.
pub struct NoReleaseNotes;

impl ReleaseNotesSource for NoReleaseNotes {
    fn release_notes(
        &self,
        _ctx: &CancelToken,
        uri: &str,
        version: &Version,
    ) -> Result<String, StoreError> {
        Err(StoreError::NotFound {
            uri: uri.to_string(),
            version: version.tag.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_release_notes_is_not_found() {
        let err = NoReleaseNotes
            .release_notes(&CancelToken::new(), "https://a", &Version::tag("v2.0.0"))
            .unwrap_err();
        assert_eq!(err.to_string(), "https://a@v2.0.0 was not found");
    }

    #[test]
    fn module_fs_accessors() {
        let fs = ModuleFs::new(
            PathBuf::from("/cache/a"),
            vec![PathBuf::from("README.md.tpl")],
        );
        assert_eq!(fs.root(), Path::new("/cache/a"));
        assert_eq!(fs.files().len(), 1);
    }
}
