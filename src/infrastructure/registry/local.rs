//! Filesystem-backed module registry
//!
//! Layout: `<root>/<import-path>/<version-dir>/manifest.yaml` plus template
//! files. A version directory named like a semver version (optional leading
//! `v`) is an immutable tag; any other directory is a mutable branch.
//! `file://` URIs point straight at a module directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use semver::Version as SemVer;
use tracing::debug;

use crate::domain::entities::{ModuleManifest, LOCAL_SCHEME, MODULE_MANIFEST_NAME};
use crate::domain::ports::{
    Criteria, ModuleFs, ModuleStore, ReleaseNotesSource, StoreError, VersionResolver,
    VersionResolverError,
};
use crate::domain::value_objects::{
    is_stable_channel, CancelToken, Version, VersionConstraint,
};
use crate::infrastructure::repositories::parse_module_manifest;

/// Release notes file inside a version directory.
pub const RELEASE_NOTES_FILE: &str = "CHANGELOG.md";

pub struct LocalRegistry {
    root: PathBuf,
}

enum VersionDir {
    Tag(SemVer),
    Branch,
}

impl LocalRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding every version of the module at `uri`.
    fn module_dir(&self, uri: &str) -> Option<PathBuf> {
        let (_, import_path) = uri.split_once("://")?;
        let import_path = import_path.trim_matches('/');
        if import_path.is_empty() || import_path.split('/').any(|part| part == "..") {
            return None;
        }
        Some(self.root.join(import_path))
    }

    /// Directory holding the content of `uri` at `version`.
    fn version_dir(&self, uri: &str, version: &Version) -> Result<PathBuf, StoreError> {
        let dir = match uri.strip_prefix(LOCAL_SCHEME) {
            Some(path) => PathBuf::from(path),
            None => self
                .module_dir(uri)
                .ok_or_else(|| StoreError::Unsupported {
                    uri: uri.to_string(),
                })?
                .join(&version.tag),
        };
        if !dir.is_dir() {
            return Err(StoreError::NotFound {
                uri: uri.to_string(),
                version: version.tag.clone(),
            });
        }
        Ok(dir)
    }

    fn list_versions(dir: &Path) -> io::Result<Vec<(String, VersionDir)>> {
        let mut versions = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let kind = match SemVer::parse(name.strip_prefix('v').unwrap_or(&name)) {
                Ok(semver) => VersionDir::Tag(semver),
                Err(_) => VersionDir::Branch,
            };
            versions.push((name, kind));
        }
        Ok(versions)
    }
}

/// Pre-release tags belong to the channel named by their first identifier.
fn tag_channel(version: &SemVer) -> &str {
    version.pre.as_str().split('.').next().unwrap_or_default()
}

fn eligible(version: &SemVer, channel: &str, constraints: &[VersionConstraint]) -> bool {
    if version.pre.is_empty() {
        return constraints.iter().all(|c| c.matches(version));
    }
    let in_channel = !is_stable_channel(channel) && tag_channel(version) == channel;
    if in_channel && constraints.iter().all(|c| c.matches_relaxed(version)) {
        return true;
    }
    // An explicit constraint may name a pre-release directly (e.g. a pinned `=1.2.0-rc.1`)
    !constraints.is_empty() && constraints.iter().all(|c| c.matches(version))
}

impl VersionResolver for LocalRegistry {
    fn resolve(
        &self,
        ctx: &CancelToken,
        _token: Option<&str>,
        criteria: &Criteria,
    ) -> Result<Version, VersionResolverError> {
        if ctx.is_cancelled() {
            return Err(VersionResolverError::Cancelled);
        }
        if criteria.url.starts_with(LOCAL_SCHEME) {
            return Ok(Version::local());
        }

        let dir = self
            .module_dir(&criteria.url)
            .filter(|dir| dir.is_dir())
            .ok_or_else(|| VersionResolverError::NotFound {
                url: criteria.url.clone(),
            })?;
        let constraints = criteria
            .constraints
            .iter()
            .map(|raw| VersionConstraint::parse(raw))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| VersionResolverError::InvalidConstraint {
                url: criteria.url.clone(),
                message: e.to_string(),
            })?;
        let versions =
            Self::list_versions(&dir).map_err(|e| VersionResolverError::Unavailable {
                url: criteria.url.clone(),
                message: e.to_string(),
            })?;

        let branch = versions
            .iter()
            .find(|(name, kind)| matches!(kind, VersionDir::Branch) && *name == criteria.channel)
            .map(|(name, _)| name)
            .filter(|_| criteria.allow_branches && !is_stable_channel(&criteria.channel));
        if let Some(name) = branch.filter(|_| constraints.is_empty()) {
            debug!(url = %criteria.url, branch = %name, "selected branch");
            return Ok(Version::branch(name.clone()));
        }

        let best = versions
            .iter()
            .filter_map(|(name, kind)| match kind {
                VersionDir::Tag(semver) => Some((semver, name)),
                VersionDir::Branch => None,
            })
            .filter(|(semver, _)| eligible(semver, &criteria.channel, &constraints))
            .max_by(|a, b| a.0.cmp(b.0));
        if let Some((_, name)) = best {
            debug!(url = %criteria.url, version = %name, "selected tag");
            return Ok(Version::tag(name.clone()));
        }

        match branch {
            Some(name) => {
                debug!(url = %criteria.url, branch = %name, "selected branch");
                Ok(Version::branch(name.clone()))
            }
            None => Err(VersionResolverError::NoMatch {
                url: criteria.url.clone(),
                criteria: criteria.describe(),
            }),
        }
    }
}

impl ModuleStore for LocalRegistry {
    fn manifest(
        &self,
        ctx: &CancelToken,
        uri: &str,
        version: &Version,
    ) -> Result<ModuleManifest, StoreError> {
        if ctx.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        let path = self.version_dir(uri, version)?.join(MODULE_MANIFEST_NAME);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound {
                uri: uri.to_string(),
                version: version.tag.clone(),
            },
            _ => StoreError::Io {
                uri: uri.to_string(),
                message: e.to_string(),
            },
        })?;
        parse_module_manifest(&content).map_err(|e| StoreError::InvalidManifest {
            uri: uri.to_string(),
            version: version.tag.clone(),
            message: e.to_string(),
        })
    }

    fn filesystem(
        &self,
        ctx: &CancelToken,
        uri: &str,
        version: &Version,
    ) -> Result<ModuleFs, StoreError> {
        if ctx.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        let root = self.version_dir(uri, version)?;

        let mut files = Vec::new();
        let walker = WalkBuilder::new(&root)
            .hidden(false)
            .require_git(false)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();
        for entry in walker {
            let entry = entry.map_err(|e| StoreError::Io {
                uri: uri.to_string(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&root) else {
                continue;
            };
            if relative == Path::new(MODULE_MANIFEST_NAME) {
                continue;
            }
            files.push(relative.to_path_buf());
        }
        files.sort();
        Ok(ModuleFs::new(root, files))
    }
}

impl ReleaseNotesSource for LocalRegistry {
    fn release_notes(
        &self,
        ctx: &CancelToken,
        uri: &str,
        version: &Version,
    ) -> Result<String, StoreError> {
        if ctx.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        let path = self.version_dir(uri, version)?.join(RELEASE_NOTES_FILE);
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound {
                uri: uri.to_string(),
                version: version.tag.clone(),
            },
            _ => StoreError::Io {
                uri: uri.to_string(),
                message: e.to_string(),
            },
        })
    }
}
