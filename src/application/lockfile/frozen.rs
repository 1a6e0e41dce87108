//! Frozen lockfile replay
//!
//! Rewrites the requested module list so that resolution reproduces the
//! previous lockfile: every requested module is pinned to its locked version
//! and locked modules nobody requested directly become top-level requests.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::entities::{Lockfile, ModuleRef, LOCAL_SCHEME};
use crate::error::ResolveError;

pub fn use_modules_from_lock(
    requested: &mut Vec<ModuleRef>,
    lockfile: Option<&Lockfile>,
) -> Result<(), ResolveError> {
    let lockfile = lockfile.ok_or(ResolveError::LockfileRequired)?;

    let desired: HashSet<String> = requested.iter().map(|m| m.name.clone()).collect();
    let locked: HashSet<&str> = lockfile.modules().iter().map(|m| m.name.as_str()).collect();

    let mut reasons = Vec::new();
    for module in requested.iter() {
        if !locked.contains(module.name.as_str()) {
            let reason = format!("module {} is not in the lockfile", module.name);
            if !reasons.contains(&reason) {
                reasons.push(reason);
            }
        }
    }
    if !reasons.is_empty() {
        return Err(ResolveError::MissingFromLock { reasons });
    }

    if let Some(local) = lockfile
        .modules()
        .iter()
        .find(|m| m.url.starts_with(LOCAL_SCHEME))
    {
        return Err(ResolveError::NonDeterministicReplacement {
            module: local.name.clone(),
            url: local.url.clone(),
        });
    }

    for module in requested.iter_mut() {
        if let Some(pinned) = lockfile.module(&module.name) {
            module.channel.clear();
            module.prerelease = false;
            module.version = pinned.version.clone();
        }
    }

    for pinned in lockfile.modules() {
        if !desired.contains(&pinned.name) {
            debug!(module = %pinned.name, version = %pinned.version, "adding locked module");
            requested.push(ModuleRef::new(&pinned.name).with_version(&pinned.version));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::entities::LockedModule;

    fn lockfile(modules: &[(&str, &str, &str)]) -> Lockfile {
        let generated = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut lockfile = Lockfile::new("0.4.0", generated);
        for (name, url, version) in modules {
            lockfile.push_module(LockedModule::new(*name, *url, *version));
        }
        lockfile
    }

    #[test]
    fn requires_a_lockfile() {
        let mut requested = vec![ModuleRef::new("a")];
        let err = use_modules_from_lock(&mut requested, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "frozen lockfile requires a lockfile to exist"
        );
    }

    #[test]
    fn pins_requested_and_adds_locked_modules() {
        let lock = lockfile(&[
            ("a", "https://a", "v1.0.0"),
            ("b", "https://b", "v2.0.0"),
        ]);
        let mut requested = vec![ModuleRef::new("a")
            .with_version("^1.0.0")
            .with_channel("rc")
            .with_prerelease(true)];

        use_modules_from_lock(&mut requested, Some(&lock)).unwrap();

        assert_eq!(
            requested,
            vec![
                ModuleRef::new("a").with_version("v1.0.0"),
                ModuleRef::new("b").with_version("v2.0.0"),
            ]
        );
    }

    #[test]
    fn collects_every_missing_module() {
        let lock = lockfile(&[("a", "https://a", "v1.0.0")]);
        let mut requested = vec![ModuleRef::new("c"), ModuleRef::new("a"), ModuleRef::new("d")];

        match use_modules_from_lock(&mut requested, Some(&lock)) {
            Err(ResolveError::MissingFromLock { reasons }) => assert_eq!(
                reasons,
                [
                    "module c is not in the lockfile",
                    "module d is not in the lockfile"
                ]
            ),
            other => panic!("expected MissingFromLock, got {other:?}"),
        }
    }

    #[test]
    fn rejects_locked_local_paths() {
        let lock = lockfile(&[
            ("a", "https://a", "v1.0.0"),
            ("b", "file:///home/dev/b", "local"),
        ]);
        let mut requested = vec![ModuleRef::new("a")];

        match use_modules_from_lock(&mut requested, Some(&lock)) {
            Err(ResolveError::NonDeterministicReplacement { module, url }) => {
                assert_eq!(module, "b");
                assert_eq!(url, "file:///home/dev/b");
            }
            other => panic!("expected NonDeterministicReplacement, got {other:?}"),
        }
    }
}
