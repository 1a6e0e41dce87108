//! On-disk resolution cache
//!
//! One JSON-encoded `Version` per (URI, channel), named after the SHA-256 of
//! the pair. An entry is fresh while its modification time is within the TTL.
//! Writes hold an exclusive lock on `<dir>/.lock`.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use fs2::FileExt;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::ports::{CacheError, ResolutionCache};
use crate::domain::value_objects::Version;
use crate::infrastructure::fs::atomic_write;

/// Default freshness window.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

/// `<user cache dir>/quarry/resolutions`
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("quarry")
        .join("resolutions")
}

/// Hex SHA-256 of `uri`, a NUL byte and `channel`.
pub fn cache_key(uri: &str, channel: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(uri.as_bytes());
    hasher.update(b"\0");
    hasher.update(channel.as_bytes());
    hex::encode(hasher.finalize())
}

pub struct FsResolutionCache {
    dir: PathBuf,
    ttl: Duration,
}

impl FsResolutionCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    fn entry_path(&self, uri: &str, channel: &str) -> PathBuf {
        self.dir.join(format!("{}.json", cache_key(uri, channel)))
    }

    fn is_fresh(&self, path: &Path) -> bool {
        let modified = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => return false,
        };
        match SystemTime::now().duration_since(modified) {
            Ok(age) => age <= self.ttl,
            // Modified in the future (clock skew): treat as fresh
            Err(_) => true,
        }
    }

    fn lock(&self) -> Result<File, CacheError> {
        let io_err = |e: std::io::Error| CacheError::Io {
            path: self.dir.clone(),
            message: e.to_string(),
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(self.dir.join(".lock"))
            .map_err(io_err)?;
        file.lock_exclusive().map_err(io_err)?;
        Ok(file)
    }
}

impl Default for FsResolutionCache {
    fn default() -> Self {
        Self::new(default_cache_dir(), DEFAULT_CACHE_TTL)
    }
}

impl ResolutionCache for FsResolutionCache {
    fn lookup(&self, uri: &str, channel: &str) -> Option<Version> {
        let path = self.entry_path(uri, channel);
        if !self.is_fresh(&path) {
            return None;
        }
        let content = fs::read(&path).ok()?;
        match serde_json::from_slice(&content) {
            Ok(version) => Some(version),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "ignoring unreadable cache entry");
                None
            }
        }
    }

    fn store(&self, uri: &str, channel: &str, version: &Version) -> Result<(), CacheError> {
        let content = serde_json::to_vec(version).map_err(|e| CacheError::Encode {
            message: e.to_string(),
        })?;
        let path = self.entry_path(uri, channel);

        let lock = self.lock()?;
        let result = atomic_write(&path, &content).map_err(|e| CacheError::Io {
            path: path.clone(),
            message: e.to_string(),
        });
        let _ = lock.unlock();
        result
    }
}
