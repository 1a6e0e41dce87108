//! Resolve Options
//!
//! Configuration types for resolve runs.

use std::path::PathBuf;
use std::thread;

use crate::domain::entities::{Module, LOCKFILE_NAME};
use crate::domain::value_objects::CancelToken;

/// Worker count when none is configured.
pub fn default_concurrency() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Options for the resolve use case
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Lockfile read before resolving (and written afterwards, if asked)
    pub lockfile_path: PathBuf,
    /// Reproduce the lockfile exactly
    pub frozen: bool,
    pub allow_major_version_upgrades: bool,
    /// Number of resolver workers
    pub concurrency: usize,
    /// Credential for the version resolver
    pub token: Option<String>,
    pub write_lockfile: bool,
    /// Also list each resolved module's files
    pub list_files: bool,
    /// Modules used as-is instead of being resolved
    pub injected: Vec<Module>,
    pub cancel: CancelToken,
}

impl ResolveOptions {
    pub fn new(lockfile_path: impl Into<PathBuf>) -> Self {
        Self {
            lockfile_path: lockfile_path.into(),
            frozen: false,
            allow_major_version_upgrades: false,
            concurrency: default_concurrency(),
            token: None,
            write_lockfile: false,
            list_files: false,
            injected: Vec::new(),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self
    }

    pub fn with_major_version_upgrades(mut self, allow: bool) -> Self {
        self.allow_major_version_upgrades = allow;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_write_lockfile(mut self, write: bool) -> Self {
        self.write_lockfile = write;
        self
    }

    pub fn with_list_files(mut self, list: bool) -> Self {
        self.list_files = list;
        self
    }

    pub fn with_injected(mut self, module: Module) -> Self {
        self.injected.push(module);
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::new(LOCKFILE_NAME)
    }
}
