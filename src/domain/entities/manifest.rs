//! Manifests
//!
//! A `RootManifest` (`quarry.yaml`) describes the repository being generated:
//! which modules it consumes and the argument values passed to them. Every
//! template module ships a `ModuleManifest` (`manifest.yaml`) that lists its
//! own dependencies and declares the arguments it accepts.

use std::collections::BTreeMap;

use serde_yaml_ng::Value;

use crate::domain::value_objects::Argument;

/// File name of the root manifest.
pub const ROOT_MANIFEST_NAME: &str = "quarry.yaml";

/// File name of a module's manifest.
pub const MODULE_MANIFEST_NAME: &str = "manifest.yaml";

/// Channel implied by the legacy `prerelease: true` flag.
pub const PRERELEASE_CHANNEL: &str = "rc";

/// A request for a module, as written by a parent manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRef {
    /// Import path, e.g. `github.com/org/templates-base`.
    pub name: String,
    /// Requested version constraint (or, legacy, a channel/branch name).
    pub version: String,
    pub channel: String,
    /// Legacy flag: with no channel set, selects the `rc` channel.
    pub prerelease: bool,
}

impl ModuleRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn with_prerelease(mut self, prerelease: bool) -> Self {
        self.prerelease = prerelease;
        self
    }

    /// The channel this request asks for, honoring the `prerelease` flag.
    pub fn effective_channel(&self) -> &str {
        if self.channel.is_empty() && self.prerelease {
            PRERELEASE_CHANNEL
        } else {
            &self.channel
        }
    }
}

/// The manifest of the repository being generated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootManifest {
    pub name: String,
    pub arguments: BTreeMap<String, Value>,
    pub modules: Vec<ModuleRef>,
    /// Module name → URL to fetch it from instead of `https://<name>`.
    pub replacements: BTreeMap<String, String>,
}

impl RootManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_module(mut self, module: ModuleRef) -> Self {
        self.modules.push(module);
        self
    }

    pub fn with_replacement(mut self, module: impl Into<String>, url: impl Into<String>) -> Self {
        self.replacements.insert(module.into(), url.into());
        self
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }

    /// Label used as the parent of top-level requests in diagnostics.
    pub fn requester(&self) -> String {
        format!("{} (top-level)", self.name)
    }
}

/// A command a module wants run after the repository is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRunCommand {
    pub name: String,
    pub command: String,
}

/// The manifest shipped inside a template module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleManifest {
    pub name: String,
    pub modules: Vec<ModuleRef>,
    pub arguments: BTreeMap<String, Argument>,
    pub post_run_commands: Vec<PostRunCommand>,
}

impl ModuleManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_module(mut self, module: ModuleRef) -> Self {
        self.modules.push(module);
        self
    }

    pub fn with_argument(mut self, name: impl Into<String>, argument: Argument) -> Self {
        self.arguments.insert(name.into(), argument);
        self
    }
}
