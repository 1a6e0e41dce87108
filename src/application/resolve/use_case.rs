//! Resolve Use Case
//!
//! Orchestrates a resolution run:
//! 1. Load the previous lockfile
//! 2. Replay it (frozen mode only)
//! 3. Resolve every module with the worker pool
//! 4. Stop at unconfirmed major-version upgrades
//! 5. Validate arguments against the resolved manifests
//! 6. Optionally list module files and write a new lockfile

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::application::arguments::validate_arguments;
use crate::application::lockfile::{use_modules_from_lock, UpgradeGate};
use crate::domain::entities::{Lockfile, ResolvedModule, RootManifest};
use crate::domain::ports::{
    LockfileRepository, ModuleStore, NoCache, NoReleaseNotes, NonInteractivePrompter,
    ReleaseNotesSource, ResolutionCache, StoreError, UpgradePrompter, VersionResolver,
};
use crate::error::{QuarryResult, ResolveError};

use super::options::ResolveOptions;
use super::resolver::Resolver;
use super::result::{ModuleFiles, ResolveOutcome};

/// Resolve use case - parameterized by its collaborators (ports)
pub struct ResolveUseCase {
    versions: Arc<dyn VersionResolver>,
    store: Arc<dyn ModuleStore>,
    lockfiles: Arc<dyn LockfileRepository>,
    cache: Arc<dyn ResolutionCache>,
    notes: Arc<dyn ReleaseNotesSource>,
    prompter: Arc<dyn UpgradePrompter>,
}

impl ResolveUseCase {
    pub fn new(
        versions: Arc<dyn VersionResolver>,
        store: Arc<dyn ModuleStore>,
        lockfiles: Arc<dyn LockfileRepository>,
    ) -> Self {
        Self {
            versions,
            store,
            lockfiles,
            cache: Arc::new(NoCache),
            notes: Arc::new(NoReleaseNotes),
            prompter: Arc::new(NonInteractivePrompter),
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResolutionCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_release_notes(mut self, notes: Arc<dyn ReleaseNotesSource>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_prompter(mut self, prompter: Arc<dyn UpgradePrompter>) -> Self {
        self.prompter = prompter;
        self
    }

    pub fn execute(
        &self,
        manifest: &RootManifest,
        options: &ResolveOptions,
    ) -> QuarryResult<ResolveOutcome> {
        let previous = self.lockfiles.load(&options.lockfile_path)?;
        if previous.is_none() {
            debug!(path = %options.lockfile_path.display(), "no previous lockfile");
        }

        let mut requested = manifest.modules.clone();
        if options.frozen {
            use_modules_from_lock(&mut requested, previous.as_ref())?;
        }

        let resolver = Resolver::new(
            self.versions.as_ref(),
            self.store.as_ref(),
            self.cache.as_ref(),
            manifest.replacements.clone(),
        )
        .with_concurrency(options.concurrency)
        .with_token(options.token.clone())
        .with_cancel_token(options.cancel.clone());
        for module in &options.injected {
            resolver.inject(module.clone());
        }
        let modules = resolver.resolve(&requested, &manifest.requester())?;
        info!(modules = modules.len(), "resolved modules");

        if let Some(previous) = &previous {
            UpgradeGate::new(
                options.allow_major_version_upgrades,
                self.prompter.as_ref(),
                self.notes.as_ref(),
                &options.cancel,
            )
            .check(&modules, previous)?;
        }

        validate_arguments(manifest, &modules)?;

        let mut outcome = ResolveOutcome {
            warnings: reproducibility_warnings(&modules),
            ..ResolveOutcome::default()
        };

        if options.list_files {
            outcome.files = self.list_files(&modules, options)?;
        }

        if options.write_lockfile {
            let lockfile = Lockfile::from_resolution(&modules, previous.as_ref(), Utc::now());
            self.lockfiles.save(&lockfile, &options.lockfile_path)?;
            info!(path = %options.lockfile_path.display(), "wrote lockfile");
            outcome.lockfile_written = Some(options.lockfile_path.clone());
        }

        outcome.modules = modules;
        Ok(outcome)
    }

    fn list_files(
        &self,
        modules: &[ResolvedModule],
        options: &ResolveOptions,
    ) -> QuarryResult<Vec<ModuleFiles>> {
        modules
            .iter()
            .map(|rm| {
                let version = rm.module.version();
                self.store
                    .filesystem(&options.cancel, rm.module.uri(), version)
                    .map(|fs| ModuleFiles {
                        module: rm.name().to_string(),
                        fs,
                    })
                    .map_err(|source| match source {
                        StoreError::Cancelled => ResolveError::Cancelled,
                        source => ResolveError::Filesystem {
                            module: rm.name().to_string(),
                            version: version.tag.clone(),
                            source,
                        },
                    })
            })
            .collect()
    }
}

fn reproducibility_warnings(modules: &[ResolvedModule]) -> Vec<String> {
    modules
        .iter()
        .filter(|rm| rm.module.is_mutable())
        .map(|rm| {
            if rm.module.is_local() {
                format!("{} uses local path {}", rm.name(), rm.module.uri())
            } else {
                format!(
                    "{} resolved to branch {}; the result is not reproducible",
                    rm.name(),
                    rm.module.version()
                )
            }
        })
        .collect()
}
