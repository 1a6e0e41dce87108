//! Upgrade Prompter Port
//!
//! Asks the operator to confirm a major-version upgrade of a module.
//! Implementations can be interactive (prompting on a terminal) or fixed.

use std::io;

/// What the operator is asked to confirm.
#[derive(Debug, Clone)]
pub struct UpgradeNotice<'a> {
    pub module: &'a str,
    pub from: &'a str,
    pub to: &'a str,
    /// Raw (markdown) release notes of the new version, when available
    pub release_notes: Option<&'a str>,
}

pub trait UpgradePrompter: Send + Sync {
    /// Whether a person can answer prompts.
    fn is_interactive(&self) -> bool;

    /// Show the notice and ask for confirmation.
    ///
    /// `Ok(false)` means declined; an error means the prompt itself failed.
    fn confirm(&self, notice: &UpgradeNotice) -> io::Result<bool>;
}

/// Prompter for non-interactive runs (CI, piped stdin).
///
/// Never asks; the upgrade gate rejects any major upgrade that was not
/// allowed up front.
pub struct NonInteractivePrompter;

impl UpgradePrompter for NonInteractivePrompter {
    fn is_interactive(&self) -> bool {
        false
    }

    fn confirm(&self, _notice: &UpgradeNotice) -> io::Result<bool> {
        Ok(false)
    }
}
