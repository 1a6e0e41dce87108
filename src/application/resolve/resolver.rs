//! Resolver driver
//!
//! Owns the per-run state (work queue and ledger) and runs a fixed pool of
//! worker threads against it. Each worker pops a task, settles a version for
//! the task's module, fetches the manifest of a newly chosen version and
//! queues the modules it lists.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::domain::entities::{Module, ModuleRef, ResolvedModule, LOCAL_SCHEME};
use crate::domain::ports::{
    Criteria, ModuleStore, ResolutionCache, StoreError, VersionResolver, VersionResolverError,
};
use crate::domain::services::{LedgerEntry, PoppedTask, ResolveTask, WorkQueue};
use crate::domain::value_objects::{is_stable_channel, CancelToken, Version, VersionConstraint};
use crate::error::{QuarryResult, ResolveError};

pub struct Resolver<'a> {
    versions: &'a dyn VersionResolver,
    store: &'a dyn ModuleStore,
    cache: &'a dyn ResolutionCache,
    queue: WorkQueue,
    concurrency: usize,
    token: Option<String>,
    cancel: CancelToken,
}

impl<'a> Resolver<'a> {
    /// `replacements` maps module names to the URL (or `file://` path) to fetch them from.
    pub fn new(
        versions: &'a dyn VersionResolver,
        store: &'a dyn ModuleStore,
        cache: &'a dyn ResolutionCache,
        replacements: BTreeMap<String, String>,
    ) -> Self {
        Self {
            versions,
            store,
            cache,
            queue: WorkQueue::new(replacements),
            concurrency: 1,
            token: None,
            cancel: CancelToken::new(),
        }
    }

    /// Number of worker threads; at least one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Credential handed to the version resolver.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Use `module` as-is whenever its name is requested.
    pub fn inject(&self, module: Module) {
        self.queue.inject(module);
    }

    /// Resolve `modules` and everything they depend on.
    ///
    /// Returns one entry per module name, in discovery order. The first error
    /// any worker hits stops the run and is returned once all workers exit.
    pub fn resolve(
        &self,
        modules: &[ModuleRef],
        parent: &str,
    ) -> QuarryResult<Vec<ResolvedModule>> {
        for spec in modules {
            self.queue.push(ResolveTask::new(spec.clone(), parent));
        }

        debug!(
            modules = modules.len(),
            workers = self.concurrency,
            "resolving modules"
        );
        let failure: Mutex<Option<ResolveError>> = Mutex::new(None);
        thread::scope(|scope| {
            for _ in 0..self.concurrency {
                scope.spawn(|| self.work(&failure));
            }
        });

        if let Some(err) = failure.into_inner() {
            return Err(err);
        }
        if self.cancel.is_cancelled() {
            return Err(ResolveError::Cancelled);
        }
        Ok(self.collect())
    }

    fn work(&self, failure: &Mutex<Option<ResolveError>>) {
        while let Some(popped) = self.queue.pop() {
            let result = if self.cancel.is_cancelled() {
                Err(ResolveError::Cancelled)
            } else {
                self.process(popped)
            };
            if let Err(err) = result {
                let mut first = failure.lock();
                if first.is_none() {
                    *first = Some(err);
                }
                drop(first);
                self.queue.close();
                debug!(pending = self.queue.pending(), "resolution stopped");
                return;
            }
        }
    }

    fn process(&self, popped: PoppedTask<'_>) -> Result<(), ResolveError> {
        let name = popped.name().to_string();
        let mut entry = popped.entry.lock();

        let module = match &popped.fetch_uri {
            None => match entry.chosen() {
                Some(module) => module.clone(),
                None => return Ok(()),
            },
            Some(uri) => {
                let module = self.resolve_entry(&name, uri, &entry)?;
                entry.choose(module.clone());
                module
            }
        };

        if !entry.needs_expansion(&module.version().tag) {
            return Ok(());
        }

        let manifest = self
            .store
            .manifest(&self.cancel, module.uri(), module.version())
            .map_err(|source| match source {
                StoreError::Cancelled => ResolveError::Cancelled,
                source => ResolveError::Manifest {
                    module: name.clone(),
                    version: module.version().tag.clone(),
                    source,
                },
            })?;
        let manifest = Arc::new(manifest);
        entry.mark_expanded(module.version().tag.clone(), Arc::clone(&manifest));
        drop(entry);

        let parent = format!("{}@{}", name, module.version());
        debug!(
            module = %name,
            version = %module.version(),
            dependencies = manifest.modules.len(),
            "expanded module"
        );
        for child in &manifest.modules {
            self.queue
                .push(ResolveTask::new(child.clone(), parent.clone()));
        }
        Ok(())
    }

    /// Pick a version for one entry, given everything requested of it so far.
    fn resolve_entry(
        &self,
        name: &str,
        uri: &str,
        entry: &LedgerEntry,
    ) -> Result<Module, ResolveError> {
        let channel = entry
            .channel()
            .map_err(|conflict| ResolveError::ChannelConflict {
                module: name.to_string(),
                channel: conflict.channel,
                parent: conflict.parent,
                previous_channel: conflict.previous_channel,
                previous_parent: conflict.previous_parent,
            })?;
        let constraints = entry.constraints();

        if let Some(chosen) = entry.chosen().filter(|m| m.is_mutable()) {
            warn!(
                module = %name,
                version = %chosen.version(),
                "module resolved to a mutable version; the result is not reproducible"
            );
            return Ok(chosen.clone());
        }

        let version = self
            .latest_version(uri, &channel, &constraints)
            .map_err(|source| match source {
                VersionResolverError::Cancelled => ResolveError::Cancelled,
                source @ (VersionResolverError::NoMatch { .. }
                | VersionResolverError::InvalidConstraint { .. }) => {
                    ResolveError::ConstraintConflict {
                        module: name.to_string(),
                        history: entry.diagnostic(),
                        source,
                    }
                }
                source => ResolveError::VersionResolution {
                    module: name.to_string(),
                    source,
                },
            })?;

        debug!(module = %name, version = %version, channel = %channel, "chose version");
        Ok(Module::new(name, uri, version))
    }

    fn latest_version(
        &self,
        uri: &str,
        channel: &str,
        constraints: &[String],
    ) -> Result<Version, VersionResolverError> {
        if uri.starts_with(LOCAL_SCHEME) {
            return Ok(Version::local());
        }

        if let Some(cached) = self.cache.lookup(uri, channel) {
            if satisfies_all(&cached, channel, constraints) {
                debug!(uri, channel, version = %cached, "resolution cache hit");
                return Ok(cached);
            }
        }

        let criteria = Criteria {
            url: uri.to_string(),
            channel: channel.to_string(),
            constraints: constraints.to_vec(),
            allow_branches: true,
        };
        let version = self
            .versions
            .resolve(&self.cancel, self.token.as_deref(), &criteria)?;

        if let Err(err) = self.cache.store(uri, channel, &version) {
            warn!(uri, error = %err, "failed to cache resolved version");
        }
        Ok(version)
    }

    fn collect(&self) -> Vec<ResolvedModule> {
        let mut resolved = Vec::new();
        for (name, entry) in self.queue.discovered() {
            let entry = entry.lock();
            match (entry.chosen(), entry.manifest()) {
                (Some(module), Some(manifest)) => resolved.push(ResolvedModule {
                    module: module.clone(),
                    manifest: Arc::clone(manifest),
                }),
                _ => debug!(module = %name, "module has no manifest"),
            }
        }
        resolved
    }
}

/// Whether a cached version still answers every constraint.
fn satisfies_all(version: &Version, channel: &str, constraints: &[String]) -> bool {
    if constraints.is_empty() {
        return true;
    }
    let Some(semver) = version.semver() else {
        return false;
    };
    constraints.iter().all(|raw| match VersionConstraint::parse(raw) {
        Ok(constraint) if is_stable_channel(channel) => constraint.matches(&semver),
        Ok(constraint) => constraint.matches_relaxed(&semver),
        Err(_) => false,
    })
}
