//! Value Objects
//!
//! Immutable types without identity.
//! - `Version` / `VersionConstraint` / `VersionSpec` - what was requested and what was picked
//! - `Argument` - typed module argument declarations
//! - `CancelToken` - cooperative cancellation for a resolution run

mod argument;
mod cancel;
mod version;

pub use argument::{Argument, ArgumentError, ArgumentType};
pub use cancel::CancelToken;
pub use version::{
    is_stable_channel, parse_version_loose, ConstraintParseError, Version, VersionConstraint,
    VersionSpec, LOCAL_VERSION, STABLE_CHANNEL,
};
