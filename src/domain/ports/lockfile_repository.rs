//! LockfileRepository port - abstraction for lockfile persistence
//!
//! This trait allows the application layer to load/save lockfiles
//! without knowing about YAML serialization details.

use std::path::{Path, PathBuf};

use crate::domain::entities::Lockfile;

/// Lockfile operation errors
#[derive(Debug, thiserror::Error)]
pub enum LockfileError {
    #[error("failed to read lockfile {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("invalid lockfile {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to serialize lockfile: {message}")]
    Serialize { message: String },
}

/// Abstract repository for lockfile persistence
pub trait LockfileRepository: Send + Sync {
    /// Load the lockfile at `path`; `Ok(None)` when there is none.
    fn load(&self, path: &Path) -> Result<Option<Lockfile>, LockfileError>;

    /// Save lockfile to path
    fn save(&self, lockfile: &Lockfile, path: &Path) -> Result<(), LockfileError>;
}
