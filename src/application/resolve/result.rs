//! Resolve Result

use std::path::PathBuf;

use crate::domain::entities::ResolvedModule;
use crate::domain::ports::ModuleFs;

/// Files of one resolved module, when requested
#[derive(Debug, Clone)]
pub struct ModuleFiles {
    pub module: String,
    pub fs: ModuleFs,
}

/// Result of a successful resolve run
#[derive(Debug, Clone, Default)]
pub struct ResolveOutcome {
    /// Resolved modules in discovery order
    pub modules: Vec<ResolvedModule>,
    /// Things the operator should know about (mutable or local versions)
    pub warnings: Vec<String>,
    pub files: Vec<ModuleFiles>,
    /// Where the lockfile was written, if it was
    pub lockfile_written: Option<PathBuf>,
}

impl ResolveOutcome {
    pub fn is_reproducible(&self) -> bool {
        self.modules.iter().all(|m| !m.module.is_mutable())
    }
}
