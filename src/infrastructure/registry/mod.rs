//! Module registry implementations
//!
//! - `LocalRegistry` - a directory tree of versioned modules

mod local;

pub use local::{LocalRegistry, RELEASE_NOTES_FILE};
