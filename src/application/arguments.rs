//! Argument validation
//!
//! Checks the root manifest's argument values against the arguments every
//! resolved module declares.

use std::collections::HashSet;

use crate::domain::entities::{ResolvedModule, RootManifest};
use crate::error::ResolveError;

/// Validate `manifest.arguments` against all declarations, reporting every problem.
pub fn validate_arguments(
    manifest: &RootManifest,
    resolved: &[ResolvedModule],
) -> Result<(), ResolveError> {
    let mut problems = Vec::new();
    let mut reported: HashSet<&str> = HashSet::new();

    for module in resolved {
        for (name, argument) in &module.manifest.arguments {
            if let Err(problem) =
                argument.check(name, module.name(), manifest.arguments.get(name))
            {
                if reported.insert(name.as_str()) {
                    problems.push(problem);
                }
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ResolveError::InvalidArguments { problems })
    }
}
