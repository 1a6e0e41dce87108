//! Quarry - assemble repositories from versioned template modules
//!
//! Quarry reads a root manifest naming template modules and version ranges,
//! resolves one version of every module in the transitive graph, reconciles the
//! result with a lockfile, and hands the resolved manifests and files to the
//! generator.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{ResolveOptions, ResolveOutcome, ResolveUseCase, Resolver};
pub use config::Config;
pub use domain::entities::{
    Lockfile, Module, ModuleManifest, ModuleRef, ResolvedModule, RootManifest,
};
pub use domain::value_objects::{CancelToken, Version};
pub use error::{QuarryResult, ResolveError};
