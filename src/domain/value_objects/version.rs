//! Module versions, version constraints and release channels
//!
//! A requested version string is either a semver constraint (`^1.2.0`,
//! `>= 1.0 < 2.0`, `v1.4.2`) or, when it does not parse as one, the name of a
//! release channel or branch (`rc`, `main`). See [`VersionSpec::classify`].

use std::fmt;

use semver::{Version as SemVer, VersionReq};
use serde::{Deserialize, Serialize};

/// Channel name that is equivalent to requesting no channel at all.
pub const STABLE_CHANNEL: &str = "stable";

/// Synthetic tag used for modules replaced by a local directory.
pub const LOCAL_VERSION: &str = "local";

/// Returns true for the empty channel and `stable`.
pub fn is_stable_channel(channel: &str) -> bool {
    channel.is_empty() || channel == STABLE_CHANNEL
}

/// A concrete version picked for a module.
///
/// `mutable` is set when the tag names a moving reference (a branch, or a
/// local directory) rather than an immutable release tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub tag: String,
    #[serde(default)]
    pub mutable: bool,
}

impl Version {
    /// An immutable release tag.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            mutable: false,
        }
    }

    /// A moving branch reference.
    pub fn branch(name: impl Into<String>) -> Self {
        Self {
            tag: name.into(),
            mutable: true,
        }
    }

    /// The synthetic version of a local replacement.
    pub fn local() -> Self {
        Self::branch(LOCAL_VERSION)
    }

    /// The tag parsed as a semantic version, if it is one.
    pub fn semver(&self) -> Option<SemVer> {
        parse_version_loose(&self.tag)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

/// Parse a version tolerantly.
///
/// Accepts a leading `v` and pads missing minor/patch components with zero, so
/// `v2`, `1.4` and `v1.4.0-rc.1` all parse.
pub fn parse_version_loose(raw: &str) -> Option<SemVer> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(v) = SemVer::parse(trimmed) {
        return Some(v);
    }

    let (core, rest) = match trimmed.find(['-', '+']) {
        Some(idx) => trimmed.split_at(idx),
        None => (trimmed, ""),
    };
    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() > 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let mut padded = parts.join(".");
    for _ in parts.len()..3 {
        padded.push_str(".0");
    }
    SemVer::parse(&format!("{padded}{rest}")).ok()
}

/// Parse a complete `major.minor.patch` version (leading `v` allowed).
fn parse_version_exact(raw: &str) -> Option<SemVer> {
    let trimmed = raw.strip_prefix('v').unwrap_or(raw);
    SemVer::parse(trimmed).ok()
}

/// Error returned when a string is not a semver constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version constraint '{raw}': {message}")]
pub struct ConstraintParseError {
    pub raw: String,
    pub message: String,
}

/// A parsed semver constraint.
///
/// A bare version (`1.2.3`, `v1.2.3`) is an exact match rather than a caret
/// range, so a version pinned from a lockfile selects exactly that version.
/// Only complete versions are exact: `1.2` keeps its semver meaning of `^1.2`.
/// Whitespace-separated comparators (`>=1.0 <2.0`) are ANDed.
#[derive(Debug, Clone)]
pub struct VersionConstraint {
    raw: String,
    req: VersionReq,
    exact: bool,
}

impl VersionConstraint {
    pub fn parse(raw: &str) -> Result<Self, ConstraintParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConstraintParseError {
                raw: raw.to_string(),
                message: "empty constraint".to_string(),
            });
        }

        let exact = parse_version_exact(trimmed);
        let parsed = match &exact {
            Some(version) => VersionReq::parse(&format!("={version}")),
            None => VersionReq::parse(&normalize_req(trimmed)),
        };

        parsed
            .map(|req| Self {
                raw: trimmed.to_string(),
                req,
                exact: exact.is_some(),
            })
            .map_err(|e| ConstraintParseError {
                raw: raw.to_string(),
                message: e.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Strict semver matching: pre-releases only match comparators that name
    /// the same `major.minor.patch` with a pre-release.
    pub fn matches(&self, version: &SemVer) -> bool {
        self.req.matches(version)
    }

    /// Matching for pre-release channels: a pre-release also matches when its
    /// release version does. Exact pins never admit another version.
    pub fn matches_relaxed(&self, version: &SemVer) -> bool {
        if self.req.matches(version) {
            return true;
        }
        if self.exact || version.pre.is_empty() {
            return false;
        }
        let release = SemVer::new(version.major, version.minor, version.patch);
        self.req.matches(&release)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn is_operator_char(ch: char) -> bool {
    matches!(ch, '<' | '>' | '=' | '^' | '~')
}

fn strip_v_prefixes(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(chars.len());
    for (i, &ch) in chars.iter().enumerate() {
        let at_boundary = i == 0 || chars[i - 1].is_whitespace() || is_operator_char(chars[i - 1]);
        let before_digit = chars.get(i + 1).is_some_and(|c| c.is_ascii_digit());
        if ch == 'v' && at_boundary && before_digit {
            continue;
        }
        out.push(ch);
    }
    out
}

/// Rewrite `>= 1.0 <2.0` into the comma-separated form the semver crate expects.
fn normalize_req(raw: &str) -> String {
    let stripped = strip_v_prefixes(raw);
    if stripped.contains(',') {
        return stripped;
    }

    let mut parts: Vec<String> = Vec::new();
    let mut pending_op = String::new();
    for token in stripped.split_whitespace() {
        if token.chars().all(is_operator_char) {
            pending_op.push_str(token);
            continue;
        }
        parts.push(format!("{pending_op}{token}"));
        pending_op.clear();
    }
    if !pending_op.is_empty() {
        parts.push(pending_op);
    }
    parts.join(", ")
}

/// How a requested version string is interpreted.
#[derive(Debug, Clone)]
pub enum VersionSpec {
    /// Nothing requested.
    Any,
    /// A semver constraint.
    Constraint(VersionConstraint),
    /// Not a semver constraint: the string names a channel or branch.
    Channel(String),
}

impl VersionSpec {
    /// Classify a requested version string.
    ///
    /// Anything that fails to parse as a semver constraint is taken to be a
    /// channel name. This also swallows malformed constraints (`^1.x.y`),
    /// which then resolve as a channel of that name.
    pub fn classify(version: &str) -> Self {
        let trimmed = version.trim();
        if trimmed.is_empty() {
            return VersionSpec::Any;
        }
        match VersionConstraint::parse(trimmed) {
            Ok(constraint) => VersionSpec::Constraint(constraint),
            Err(_) => VersionSpec::Channel(trimmed.to_string()),
        }
    }
}
