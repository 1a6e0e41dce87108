//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `registry/` - Version resolution, manifests and release notes from a local registry
//! - `repositories/` - Lockfile and manifest (YAML) persistence
//! - `cache` - On-disk resolution cache
//! - `prompt` / `release_notes` - Interactive upgrade confirmation

pub mod cache;
pub mod fs;
pub mod prompt;
pub mod registry;
pub mod release_notes;
pub mod repositories;

// Re-export for convenience
pub use cache::{default_cache_dir, FsResolutionCache, DEFAULT_CACHE_TTL};
pub use prompt::TerminalPrompter;
pub use registry::LocalRegistry;
pub use repositories::{load_root_manifest, ManifestError, YamlLockfileRepository};
