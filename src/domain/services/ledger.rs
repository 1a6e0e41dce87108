//! Resolution ledger
//!
//! One `LedgerEntry` per module name records every request made for that
//! module during a run, plus the module version currently chosen for it.
//! History only ever grows; it is what conflict diagnostics are built from.

use std::sync::Arc;

use crate::domain::entities::{Module, ModuleManifest};
use crate::domain::value_objects::is_stable_channel;

/// One historical request for a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub constraint: String,
    pub channel: String,
    /// Who asked (a module@version or the root manifest)
    pub parent: String,
}

impl Resolution {
    /// What the parent asked for, as shown in diagnostics.
    pub fn wants(&self) -> &str {
        if !self.constraint.is_empty() {
            &self.constraint
        } else if !self.channel.is_empty() {
            &self.channel
        } else {
            "*"
        }
    }
}

/// Two parents asked for different non-stable channels of the same module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConflict {
    pub channel: String,
    pub parent: String,
    pub previous_channel: String,
    pub previous_parent: String,
}

/// A manifest already fetched for a chosen version; its children have been queued.
#[derive(Debug, Clone)]
struct Expansion {
    version: String,
    manifest: Arc<ModuleManifest>,
}

#[derive(Debug, Default)]
pub struct LedgerEntry {
    history: Vec<Resolution>,
    chosen: Option<Module>,
    dont_resolve: bool,
    expansion: Option<Expansion>,
}

impl LedgerEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// An entry for a module supplied by the caller that must never be resolved.
    pub fn injected(module: Module) -> Self {
        Self {
            chosen: Some(module),
            dont_resolve: true,
            ..Self::default()
        }
    }

    /// Append a request. Only the work queue records history.
    pub(crate) fn record(&mut self, resolution: Resolution) {
        self.history.push(resolution);
    }

    pub fn history(&self) -> &[Resolution] {
        &self.history
    }

    pub fn chosen(&self) -> Option<&Module> {
        self.chosen.as_ref()
    }

    pub fn choose(&mut self, module: Module) {
        self.chosen = Some(module);
    }

    pub fn is_dont_resolve(&self) -> bool {
        self.dont_resolve
    }

    /// The channel every request agrees on.
    ///
    /// Requests for the stable channel (empty or `stable`) are compatible with
    /// any other channel; two different non-stable channels are a conflict.
    pub fn channel(&self) -> Result<String, ChannelConflict> {
        let mut pinned: Option<&Resolution> = None;
        for resolution in &self.history {
            if is_stable_channel(&resolution.channel) {
                continue;
            }
            match pinned {
                None => pinned = Some(resolution),
                Some(previous) if previous.channel != resolution.channel => {
                    return Err(ChannelConflict {
                        channel: resolution.channel.clone(),
                        parent: resolution.parent.clone(),
                        previous_channel: previous.channel.clone(),
                        previous_parent: previous.parent.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(pinned.map(|r| r.channel.clone()).unwrap_or_default())
    }

    /// All distinct non-empty constraints, in request order.
    pub fn constraints(&self) -> Vec<String> {
        let mut constraints: Vec<String> = Vec::new();
        for resolution in &self.history {
            if !resolution.constraint.is_empty() && !constraints.contains(&resolution.constraint)
            {
                constraints.push(resolution.constraint.clone());
            }
        }
        constraints
    }

    /// One indented `<parent> wants <what>` line per request.
    pub fn diagnostic(&self) -> String {
        self.history
            .iter()
            .map(|r| format!("  {} wants {}", r.parent, r.wants()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether the manifest of `version` still has to be fetched and its
    /// modules queued.
    pub fn needs_expansion(&self, version: &str) -> bool {
        self.expansion
            .as_ref()
            .is_none_or(|expansion| expansion.version != version)
    }

    pub fn mark_expanded(&mut self, version: impl Into<String>, manifest: Arc<ModuleManifest>) {
        self.expansion = Some(Expansion {
            version: version.into(),
            manifest,
        });
    }

    /// Manifest of the most recently expanded version.
    pub fn manifest(&self) -> Option<&Arc<ModuleManifest>> {
        self.expansion.as_ref().map(|e| &e.manifest)
    }
}
