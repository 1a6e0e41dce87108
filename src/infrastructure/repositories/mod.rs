//! Repository Implementations

mod lockfile;
mod manifest;

pub use lockfile::{parse_lockfile, render_lockfile, YamlLockfileRepository};
pub use manifest::{
    load_root_manifest, parse_module_manifest, parse_root_manifest, ManifestError,
};
