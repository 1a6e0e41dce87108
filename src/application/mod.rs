//! Application Layer
//!
//! Use cases that orchestrate the resolution flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `ResolveUseCase` - Lockfile replay, resolution, upgrade gate, argument checks, lockfile write
//!
//! ## Services
//!
//! - `Resolver` - Concurrent resolution of a module graph
//! - `use_modules_from_lock` / `UpgradeGate` - Lockfile reconciliation
//! - `validate_arguments` - Argument checks against resolved manifests

mod arguments;
pub mod lockfile;
pub mod resolve;

pub use arguments::validate_arguments;
pub use lockfile::{detect_major_upgrades, use_modules_from_lock, MajorUpgrade, UpgradeGate};
pub use resolve::{
    default_concurrency, ModuleFiles, ResolveOptions, ResolveOutcome, ResolveUseCase, Resolver,
};
