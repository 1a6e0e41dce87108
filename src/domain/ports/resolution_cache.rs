//! ResolutionCache port - remembers the last version resolved per (URI, channel)

use std::path::PathBuf;

use crate::domain::value_objects::Version;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to access resolution cache at {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("failed to encode cache entry: {message}")]
    Encode { message: String },
}

pub trait ResolutionCache: Send + Sync {
    /// A fresh cached version, if any. Stale or unreadable entries are misses.
    fn lookup(&self, uri: &str, channel: &str) -> Option<Version>;

    fn store(&self, uri: &str, channel: &str, version: &Version) -> Result<(), CacheError>;
}

/// Cache that never hits and discards writes.
///
/// Use this when caching is disabled in configuration.
pub struct NoCache;

impl ResolutionCache for NoCache {
    fn lookup(&self, _uri: &str, _channel: &str) -> Option<Version> {
        None
    }

    fn store(&self, _uri: &str, _channel: &str, _version: &Version) -> Result<(), CacheError> {
        Ok(())
    }
}
