//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod lockfile_repository;
pub mod module_store;
pub mod resolution_cache;
pub mod upgrade_prompt;
pub mod version_resolver;

pub use lockfile_repository::{LockfileError, LockfileRepository};
pub use module_store::{ModuleFs, ModuleStore, NoReleaseNotes, ReleaseNotesSource, StoreError};
pub use resolution_cache::{CacheError, NoCache, ResolutionCache};
pub use upgrade_prompt::{NonInteractivePrompter, UpgradeNotice, UpgradePrompter};
pub use version_resolver::{Criteria, VersionResolver, VersionResolverError};
