//! Test fixtures - manifest and lockfile builders, plus an on-disk registry.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use quarry::application::{ResolveOptions, ResolveUseCase};
use quarry::domain::entities::{
    default_uri, LockedModule, Lockfile, ModuleRef, ResolvedModule, RootManifest,
    MODULE_MANIFEST_NAME,
};

use super::fakes::{FakeRegistry, MemoryLockfiles};

pub const LOCK_PATH: &str = "/project/quarry.lock";

/// Root manifest requesting `(name, version-or-channel)` pairs.
pub fn root_manifest(modules: &[(&str, &str)]) -> RootManifest {
    modules.iter().fold(RootManifest::new("payments"), |m, (name, version)| {
        m.with_module(ModuleRef::new(*name).with_version(*version))
    })
}

/// Lockfile with `(name, version)` pairs fetched from their default URLs.
pub fn lockfile(modules: &[(&str, &str)]) -> Lockfile {
    let generated = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let mut lockfile = Lockfile::new("0.4.0", generated);
    for (name, version) in modules {
        lockfile.push_module(LockedModule::new(*name, default_uri(name), *version));
    }
    lockfile
}

pub fn use_case(registry: &Arc<FakeRegistry>, lockfiles: &Arc<MemoryLockfiles>) -> ResolveUseCase {
    ResolveUseCase::new(registry.clone(), registry.clone(), lockfiles.clone())
        .with_release_notes(registry.clone())
}

pub fn options() -> ResolveOptions {
    ResolveOptions::new(LOCK_PATH).with_concurrency(4)
}

/// `name@version` of each resolved module, in output order.
pub fn pins(modules: &[ResolvedModule]) -> Vec<String> {
    modules
        .iter()
        .map(|rm| format!("{}@{}", rm.name(), rm.module.version()))
        .collect()
}

/// A local registry directory laid out as `<root>/<import-path>/<version>/`.
pub struct RegistryDir {
    pub dir: TempDir,
}

impl RegistryDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Add `name` at `version` with the given manifest body appended after `name:`.
    pub fn module(self, name: &str, version: &str, manifest_body: &str) -> Self {
        let dir = self.version_dir(name, version);
        fs::create_dir_all(dir.join("templates")).unwrap();
        fs::write(
            dir.join(MODULE_MANIFEST_NAME),
            format!("name: {name}\n{manifest_body}"),
        )
        .unwrap();
        fs::write(dir.join("templates/README.md.tpl"), "# {{ .name }}\n").unwrap();
        self
    }

    pub fn changelog(self, name: &str, version: &str, notes: &str) -> Self {
        fs::write(self.version_dir(name, version).join("CHANGELOG.md"), notes).unwrap();
        self
    }

    fn version_dir(&self, name: &str, version: &str) -> PathBuf {
        self.root().join(name).join(version)
    }
}
