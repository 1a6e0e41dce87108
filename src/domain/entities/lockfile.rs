//! Lockfile entity - records the module versions and files of the last run
//!
//! The lockfile lets a later run reproduce exactly the same module versions
//! (frozen mode) and lets the upgrade gate detect major-version jumps.
//! It's a pure data structure - I/O operations are handled by LockfileRepository.

use chrono::{DateTime, Utc};

use crate::domain::entities::ResolvedModule;

/// Default lockfile name, next to the root manifest.
pub const LOCKFILE_NAME: &str = "quarry.lock";

/// A module recorded in the lockfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedModule {
    pub name: String,
    pub url: String,
    pub version: String,
}

impl LockedModule {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            version: version.into(),
        }
    }
}

/// A rendered file recorded in the lockfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedFile {
    /// Path of the generated file, relative to the repository root
    pub name: String,
    /// Template path inside the module that produced it
    pub template: String,
    /// Name of the module that owns the template
    pub module: String,
}

/// The lockfile written after a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct Lockfile {
    /// Version of the tool that wrote it
    tool_version: String,
    generated: DateTime<Utc>,
    modules: Vec<LockedModule>,
    files: Vec<LockedFile>,
}

impl Lockfile {
    pub fn new(tool_version: impl Into<String>, generated: DateTime<Utc>) -> Self {
        Self {
            tool_version: tool_version.into(),
            generated,
            modules: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Build a lockfile from a resolution, carrying over the file records
    /// of the previous lockfile.
    pub fn from_resolution(
        resolved: &[ResolvedModule],
        previous: Option<&Lockfile>,
        generated: DateTime<Utc>,
    ) -> Self {
        let mut lockfile = Self::new(env!("CARGO_PKG_VERSION"), generated);
        for rm in resolved {
            lockfile.push_module(LockedModule::new(
                rm.module.name(),
                rm.module.uri(),
                rm.module.version().tag.clone(),
            ));
        }
        if let Some(previous) = previous {
            for file in previous.files() {
                lockfile.push_file(file.clone());
            }
        }
        lockfile
    }

    pub fn tool_version(&self) -> &str {
        &self.tool_version
    }

    pub fn generated(&self) -> DateTime<Utc> {
        self.generated
    }

    pub fn modules(&self) -> &[LockedModule] {
        &self.modules
    }

    pub fn files(&self) -> &[LockedFile] {
        &self.files
    }

    /// Look up a locked module by name
    pub fn module(&self, name: &str) -> Option<&LockedModule> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn contains_module(&self, name: &str) -> bool {
        self.module(name).is_some()
    }

    /// Insert or replace a module record (keyed by name)
    pub fn push_module(&mut self, module: LockedModule) {
        match self.modules.iter_mut().find(|m| m.name == module.name) {
            Some(existing) => *existing = module,
            None => self.modules.push(module),
        }
    }

    pub fn push_file(&mut self, file: LockedFile) {
        self.files.push(file);
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.files.is_empty()
    }
}
