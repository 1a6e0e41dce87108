//! VersionResolver port - picks a version of a module from its published refs
//!
//! Matching constraints against the refs a module publishes (tags,
//! branches) is the implementation's job; the resolver core only gathers the
//! criteria and records the answer.

use crate::domain::value_objects::{CancelToken, Version};

/// What a version must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criteria {
    pub url: String,
    /// Release channel; empty or `stable` means stable releases only.
    pub channel: String,
    /// Semver constraints, all of which must hold.
    pub constraints: Vec<String>,
    /// Whether a branch named by the channel may be returned.
    pub allow_branches: bool,
}

impl Criteria {
    /// Human-readable summary used in error messages.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.constraints.is_empty() {
            parts.push(self.constraints.join(" && "));
        }
        if !self.channel.is_empty() {
            parts.push(format!("channel {}", self.channel));
        }
        if parts.is_empty() {
            "any version".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VersionResolverError {
    #[error("no version of {url} matches {criteria}")]
    NoMatch { url: String, criteria: String },

    #[error("module {url} was not found")]
    NotFound { url: String },

    #[error("invalid constraint for {url}: {message}")]
    InvalidConstraint { url: String, message: String },

    #[error("failed to list versions of {url}: {message}")]
    Unavailable { url: String, message: String },

    #[error("version resolution cancelled")]
    Cancelled,
}

/// Resolves a module URL plus criteria to one version.
pub trait VersionResolver: Send + Sync {
    fn resolve(
        &self,
        ctx: &CancelToken,
        token: Option<&str>,
        criteria: &Criteria,
    ) -> Result<Version, VersionResolverError>;
}
