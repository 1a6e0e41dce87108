//! Major-version upgrade gate
//!
//! Compares a fresh resolution with the previous lockfile and stops at any
//! module whose major version went up, unless the operator allowed that up
//! front or confirms it now.

use tracing::{info, warn};

use crate::domain::entities::{Lockfile, ResolvedModule};
use crate::domain::ports::{ReleaseNotesSource, UpgradeNotice, UpgradePrompter};
use crate::domain::value_objects::{parse_version_loose, CancelToken, Version};
use crate::error::{ResolveError, UpgradeRejection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MajorUpgrade {
    pub module: String,
    pub uri: String,
    pub from: String,
    pub to: Version,
}

impl MajorUpgrade {
    fn rejected(&self, reason: UpgradeRejection) -> ResolveError {
        ResolveError::UpgradeRejected {
            module: self.module.clone(),
            from: self.from.clone(),
            to: self.to.tag.clone(),
            reason,
        }
    }
}

/// Modules whose resolved major version is above the locked one.
///
/// Versions that do not parse as semver on either side are not compared.
pub fn detect_major_upgrades(resolved: &[ResolvedModule], lockfile: &Lockfile) -> Vec<MajorUpgrade> {
    resolved
        .iter()
        .filter_map(|rm| {
            let locked = lockfile.module(rm.name())?;
            let from = parse_version_loose(&locked.version)?;
            let to = rm.module.version().semver()?;
            (to.major > from.major).then(|| MajorUpgrade {
                module: rm.name().to_string(),
                uri: rm.module.uri().to_string(),
                from: locked.version.clone(),
                to: rm.module.version().clone(),
            })
        })
        .collect()
}

pub struct UpgradeGate<'a> {
    allow: bool,
    prompter: &'a dyn UpgradePrompter,
    notes: &'a dyn ReleaseNotesSource,
    cancel: &'a CancelToken,
}

impl<'a> UpgradeGate<'a> {
    pub fn new(
        allow: bool,
        prompter: &'a dyn UpgradePrompter,
        notes: &'a dyn ReleaseNotesSource,
        cancel: &'a CancelToken,
    ) -> Self {
        Self {
            allow,
            prompter,
            notes,
            cancel,
        }
    }

    pub fn check(&self, resolved: &[ResolvedModule], lockfile: &Lockfile) -> Result<(), ResolveError> {
        for upgrade in detect_major_upgrades(resolved, lockfile) {
            if self.allow {
                info!(
                    module = %upgrade.module,
                    from = %upgrade.from,
                    to = %upgrade.to,
                    "accepting major version upgrade"
                );
                continue;
            }
            if !self.prompter.is_interactive() {
                return Err(upgrade.rejected(UpgradeRejection::NonInteractive));
            }

            let notes = match self.notes.release_notes(self.cancel, &upgrade.uri, &upgrade.to) {
                Ok(notes) => Some(notes),
                Err(err) => {
                    warn!(module = %upgrade.module, error = %err, "release notes unavailable");
                    None
                }
            };
            let notice = UpgradeNotice {
                module: &upgrade.module,
                from: &upgrade.from,
                to: &upgrade.to.tag,
                release_notes: notes.as_deref(),
            };
            match self.prompter.confirm(&notice) {
                Ok(true) => info!(module = %upgrade.module, to = %upgrade.to, "major version upgrade confirmed"),
                Ok(false) => return Err(upgrade.rejected(UpgradeRejection::Declined)),
                Err(err) => {
                    return Err(upgrade.rejected(UpgradeRejection::PromptFailed(err.to_string())))
                }
            }
        }
        Ok(())
    }
}
