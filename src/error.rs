//! Error types for quarry
//!
//! Uses `thiserror` for library errors; the binary wraps them with `anyhow`.

use std::fmt;

use thiserror::Error;

use crate::domain::ports::{LockfileError, StoreError, VersionResolverError};
use crate::domain::value_objects::ArgumentError;

/// Result type alias for resolution runs
pub type QuarryResult<T> = Result<T, ResolveError>;

/// Why a major-version upgrade was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeRejection {
    NonInteractive,
    Declined,
    PromptFailed(String),
}

impl fmt::Display for UpgradeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonInteractive => f.write_str(
                "stdin is not interactive; re-run with --allow-major-version-upgrades to accept it",
            ),
            Self::Declined => f.write_str("upgrade declined"),
            Self::PromptFailed(message) => write!(f, "confirmation prompt failed: {message}"),
        }
    }
}

/// Errors that abort a resolution run
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Two parents asked for different non-stable channels of one module
    #[error(
        "{module}: channel '{channel}' requested by {parent} conflicts with channel '{previous_channel}' requested by {previous_parent}"
    )]
    ChannelConflict {
        module: String,
        channel: String,
        parent: String,
        previous_channel: String,
        previous_parent: String,
    },

    /// No version satisfies every recorded request
    #[error("no version of {module} satisfies every request:\n{history}")]
    ConstraintConflict {
        module: String,
        history: String,
        #[source]
        source: VersionResolverError,
    },

    #[error("failed to resolve a version of {module}")]
    VersionResolution {
        module: String,
        #[source]
        source: VersionResolverError,
    },

    #[error("frozen lockfile requires a lockfile to exist")]
    LockfileRequired,

    #[error("lockfile is out of date:\n{}", .reasons.iter().map(|r| format!("  - {r}")).collect::<Vec<_>>().join("\n"))]
    MissingFromLock { reasons: Vec<String> },

    #[error("{module} is locked to local path {url}, which cannot be reproduced with --frozen-lockfile")]
    NonDeterministicReplacement { module: String, url: String },

    #[error("major version upgrade of {module} from {from} to {to} rejected: {reason}")]
    UpgradeRejected {
        module: String,
        from: String,
        to: String,
        reason: UpgradeRejection,
    },

    #[error("failed to fetch the manifest of {module}@{version}")]
    Manifest {
        module: String,
        version: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to list the files of {module}@{version}")]
    Filesystem {
        module: String,
        version: String,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Lockfile(#[from] LockfileError),

    #[error("invalid arguments:\n{}", .problems.iter().map(|p| format!("  - {p}")).collect::<Vec<_>>().join("\n"))]
    InvalidArguments { problems: Vec<ArgumentError> },

    #[error("resolution cancelled")]
    Cancelled,
}
