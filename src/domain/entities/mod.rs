//! Domain Entities
//!
//! - `ModuleRef` / `RootManifest` / `ModuleManifest` - what is requested
//! - `Module` / `ResolvedModule` - what was chosen
//! - `Lockfile` - what a previous run chose

mod lockfile;
mod manifest;
mod module;

pub use lockfile::{LockedFile, LockedModule, Lockfile, LOCKFILE_NAME};
pub use manifest::{
    ModuleManifest, ModuleRef, PostRunCommand, RootManifest, MODULE_MANIFEST_NAME,
    PRERELEASE_CHANNEL, ROOT_MANIFEST_NAME,
};
pub use module::{default_uri, Module, ResolvedModule, LOCAL_SCHEME};
