//! Terminal Upgrade Prompter
//!
//! Shows the upgrade and its release notes on stderr and asks for
//! confirmation with `dialoguer`.

use std::io;

use dialoguer::Confirm;
use is_terminal::IsTerminal;

use crate::domain::ports::{UpgradeNotice, UpgradePrompter};
use crate::infrastructure::release_notes::render_for_terminal;

#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl UpgradePrompter for TerminalPrompter {
    fn is_interactive(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn confirm(&self, notice: &UpgradeNotice) -> io::Result<bool> {
        eprintln!();
        eprintln!(
            "{} has a new major version: {} -> {}",
            notice.module, notice.from, notice.to
        );
        if let Some(notes) = notice.release_notes {
            eprintln!();
            eprintln!("{}", render_for_terminal(notes));
        }
        eprintln!();

        Confirm::new()
            .with_prompt(format!("Upgrade {} to {}?", notice.module, notice.to))
            .default(false)
            .interact()
            .map_err(io::Error::other)
    }
}
