//! Resolve Module
//!
//! Resolves a root manifest into one version of every transitive module.
//!
//! ## Structure
//!
//! - `resolver` - Worker pool driving the work queue (`Resolver`)
//! - `options` - Configuration types (`ResolveOptions`)
//! - `result` - Result types (`ResolveOutcome`)
//! - `use_case` - Lockfile replay, resolution, upgrade gate, argument checks (`ResolveUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use quarry::application::resolve::{ResolveOptions, ResolveUseCase};
//!
//! let use_case = ResolveUseCase::new(versions, store, lockfiles);
//! let outcome = use_case.execute(&manifest, &ResolveOptions::new("quarry.lock"))?;
//! ```

mod options;
mod resolver;
mod result;
mod use_case;

pub use options::{default_concurrency, ResolveOptions};
pub use resolver::Resolver;
pub use result::{ModuleFiles, ResolveOutcome};
pub use use_case::ResolveUseCase;
