//! In-memory collaborators for driving `ResolveUseCase` without I/O.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use quarry::domain::entities::{default_uri, Lockfile, ModuleManifest, ModuleRef};
use quarry::domain::ports::{
    Criteria, LockfileError, LockfileRepository, ModuleFs, ModuleStore, ReleaseNotesSource,
    StoreError, UpgradeNotice, UpgradePrompter, VersionResolver, VersionResolverError,
};
use quarry::domain::value_objects::{CancelToken, Version, VersionConstraint};

struct Release {
    version: Version,
    manifest: ModuleManifest,
    notes: Option<String>,
}

/// Registry of releases keyed by module URL.
///
/// Selection mirrors a real registry: the highest tag satisfying every
/// constraint, stable tags plus pre-releases of the requested channel, then a
/// branch named by the channel.
#[derive(Default)]
pub struct FakeRegistry {
    releases: HashMap<String, Vec<Release>>,
    resolve_calls: Mutex<HashMap<String, usize>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an immutable release of `name` depending on `deps` (`(name, version-or-channel)`).
    pub fn release(mut self, name: &str, tag: &str, deps: &[(&str, &str)]) -> Self {
        self.add(name, Version::tag(tag), deps, None);
        self
    }

    pub fn release_with_notes(mut self, name: &str, tag: &str, notes: &str) -> Self {
        self.add(name, Version::tag(tag), &[], Some(notes.to_string()));
        self
    }

    pub fn branch(mut self, name: &str, branch: &str, deps: &[(&str, &str)]) -> Self {
        self.add(name, Version::branch(branch), deps, None);
        self
    }

    fn add(&mut self, name: &str, version: Version, deps: &[(&str, &str)], notes: Option<String>) {
        let mut manifest = ModuleManifest::new(name);
        for (dep, req) in deps {
            manifest = manifest.with_module(ModuleRef::new(*dep).with_version(*req));
        }
        self.releases.entry(default_uri(name)).or_default().push(Release {
            version,
            manifest,
            notes,
        });
    }

    /// How often the resolver was asked about `name`.
    pub fn resolve_count(&self, name: &str) -> usize {
        self.resolve_calls
            .lock()
            .get(&default_uri(name))
            .copied()
            .unwrap_or(0)
    }

    fn find(&self, uri: &str, version: &Version) -> Result<&Release, StoreError> {
        self.releases
            .get(uri)
            .and_then(|rs| rs.iter().find(|r| &r.version == version))
            .ok_or_else(|| StoreError::NotFound {
                uri: uri.to_string(),
                version: version.tag.clone(),
            })
    }
}

impl VersionResolver for FakeRegistry {
    fn resolve(
        &self,
        ctx: &CancelToken,
        _token: Option<&str>,
        criteria: &Criteria,
    ) -> Result<Version, VersionResolverError> {
        if ctx.is_cancelled() {
            return Err(VersionResolverError::Cancelled);
        }
        *self
            .resolve_calls
            .lock()
            .entry(criteria.url.clone())
            .or_default() += 1;

        let releases =
            self.releases
                .get(&criteria.url)
                .ok_or_else(|| VersionResolverError::NotFound {
                    url: criteria.url.clone(),
                })?;
        let constraints = criteria
            .constraints
            .iter()
            .map(|c| VersionConstraint::parse(c))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| VersionResolverError::InvalidConstraint {
                url: criteria.url.clone(),
                message: e.to_string(),
            })?;

        let best = releases
            .iter()
            .filter_map(|r| r.version.semver().map(|s| (s, &r.version)))
            .filter(|(s, _)| {
                if s.pre.is_empty() {
                    return constraints.iter().all(|c| c.matches(s));
                }
                let in_channel = !criteria.channel.is_empty()
                    && s.pre.as_str().split('.').next() == Some(criteria.channel.as_str());
                (in_channel && constraints.iter().all(|c| c.matches_relaxed(s)))
                    || (!constraints.is_empty() && constraints.iter().all(|c| c.matches(s)))
            })
            .max_by(|a, b| a.0.cmp(&b.0))
            .map(|(_, v)| v.clone());
        if let Some(best) = best {
            return Ok(best);
        }

        releases
            .iter()
            .find(|r| r.version.mutable && r.version.tag == criteria.channel)
            .filter(|_| criteria.allow_branches)
            .map(|r| r.version.clone())
            .ok_or_else(|| VersionResolverError::NoMatch {
                url: criteria.url.clone(),
                criteria: criteria.describe(),
            })
    }
}

impl ModuleStore for FakeRegistry {
    fn manifest(
        &self,
        ctx: &CancelToken,
        uri: &str,
        version: &Version,
    ) -> Result<ModuleManifest, StoreError> {
        if ctx.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        if let Some(path) = uri.strip_prefix("file://") {
            return Ok(ModuleManifest::new(path));
        }
        self.find(uri, version).map(|r| r.manifest.clone())
    }

    fn filesystem(
        &self,
        _ctx: &CancelToken,
        uri: &str,
        version: &Version,
    ) -> Result<ModuleFs, StoreError> {
        self.find(uri, version)?;
        Ok(ModuleFs::new(
            PathBuf::from(uri.trim_start_matches("https://")).join(&version.tag),
            vec![PathBuf::from("templates/README.md.tpl")],
        ))
    }
}

impl ReleaseNotesSource for FakeRegistry {
    fn release_notes(
        &self,
        _ctx: &CancelToken,
        uri: &str,
        version: &Version,
    ) -> Result<String, StoreError> {
        self.find(uri, version)?
            .notes
            .clone()
            .ok_or_else(|| StoreError::NotFound {
                uri: uri.to_string(),
                version: version.tag.clone(),
            })
    }
}

/// Lockfile repository holding lockfiles in memory, keyed by path.
#[derive(Default)]
pub struct MemoryLockfiles {
    files: Mutex<HashMap<PathBuf, Lockfile>>,
}

impl MemoryLockfiles {
    pub fn with(path: &Path, lockfile: Lockfile) -> Self {
        let repo = Self::default();
        repo.files.lock().insert(path.to_path_buf(), lockfile);
        repo
    }

    pub fn get(&self, path: &Path) -> Option<Lockfile> {
        self.files.lock().get(path).cloned()
    }
}

impl LockfileRepository for MemoryLockfiles {
    fn load(&self, path: &Path) -> Result<Option<Lockfile>, LockfileError> {
        Ok(self.get(path))
    }

    fn save(&self, lockfile: &Lockfile, path: &Path) -> Result<(), LockfileError> {
        self.files.lock().insert(path.to_path_buf(), lockfile.clone());
        Ok(())
    }
}

/// What a scripted prompter answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Accept,
    Decline,
    Fail,
}

/// Interactive prompter with a canned answer that records every notice.
pub struct ScriptedPrompter {
    answer: Answer,
    pub notices: Mutex<Vec<(String, String, String, Option<String>)>>,
}

impl ScriptedPrompter {
    pub fn new(answer: Answer) -> Self {
        Self {
            answer,
            notices: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> usize {
        self.notices.lock().len()
    }
}

impl UpgradePrompter for ScriptedPrompter {
    fn is_interactive(&self) -> bool {
        true
    }

    fn confirm(&self, notice: &UpgradeNotice) -> io::Result<bool> {
        self.notices.lock().push((
            notice.module.to_string(),
            notice.from.to_string(),
            notice.to.to_string(),
            notice.release_notes.map(str::to_string),
        ));
        match self.answer {
            Answer::Accept => Ok(true),
            Answer::Decline => Ok(false),
            Answer::Fail => Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal went away")),
        }
    }
}
