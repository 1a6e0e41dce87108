use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

use quarry::application::{ResolveOptions, ResolveOutcome, ResolveUseCase};
use quarry::config::{self, Config};
use quarry::domain::entities::LOCKFILE_NAME;
use quarry::domain::ports::{NonInteractivePrompter, UpgradePrompter};
use quarry::domain::value_objects::CancelToken;
use quarry::infrastructure::{
    default_cache_dir, load_root_manifest, FsResolutionCache, LocalRegistry, TerminalPrompter,
    YamlLockfileRepository,
};

use crate::cli::ResolveArgs;

pub fn cmd_resolve(
    args: &ResolveArgs,
    write_lock: bool,
    json: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let project_root = project_root(&args.manifest);
    let (config, warnings) = config::load(config_path, &project_root)?;
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }

    let manifest = load_root_manifest(&args.manifest)
        .with_context(|| format!("failed to load {}", args.manifest.display()))?;

    let registry_root = registry_root(args, &config)?;
    debug!(registry = %registry_root.display(), "using local registry");
    let registry = Arc::new(LocalRegistry::new(registry_root));

    let prompter: Arc<dyn UpgradePrompter> = if json {
        Arc::new(NonInteractivePrompter)
    } else {
        Arc::new(TerminalPrompter::new())
    };
    let mut use_case = ResolveUseCase::new(
        registry.clone(),
        registry.clone(),
        Arc::new(YamlLockfileRepository::new()),
    )
    .with_release_notes(registry)
    .with_prompter(prompter);
    if config.cache.enabled {
        let dir = config.cache.dir.clone().unwrap_or_else(default_cache_dir);
        use_case = use_case.with_cache(Arc::new(FsResolutionCache::new(dir, config.cache_ttl())));
    }

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(err) = ctrlc::set_handler(move || handler_token.cancel()) {
        warn!(error = %err, "cannot install Ctrl+C handler");
    }

    let options = ResolveOptions::new(project_root.join(LOCKFILE_NAME))
        .with_frozen(args.frozen_lockfile)
        .with_major_version_upgrades(
            args.allow_major_version_upgrades || config.resolver.allow_major_version_upgrades,
        )
        .with_concurrency(args.concurrency.unwrap_or_else(|| config.concurrency()))
        .with_token(config.registry.token.clone())
        .with_write_lockfile(write_lock || args.write_lock)
        .with_list_files(args.files)
        .with_cancel_token(cancel);

    let outcome = use_case
        .execute(&manifest, &options)
        .with_context(|| format!("failed to resolve {}", manifest.name))?;

    if json {
        println!("{}", serde_json::to_string(&render_json(&outcome))?);
    } else {
        for warning in &outcome.warnings {
            eprintln!("warning: {warning}");
        }
        print!("{}", render_text(&outcome));
    }
    Ok(())
}

/// Directory holding the manifest; the lockfile and project config live there.
fn project_root(manifest: &Path) -> PathBuf {
    match manifest.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn registry_root(args: &ResolveArgs, config: &Config) -> Result<PathBuf> {
    match args.registry.clone().or_else(|| config.registry.root.clone()) {
        Some(root) => Ok(root),
        None => bail!("no module registry configured; pass --registry or set QUARRY_REGISTRY"),
    }
}

pub(crate) fn render_text(outcome: &ResolveOutcome) -> String {
    let mut out = String::new();
    let noun = if outcome.modules.len() == 1 { "module" } else { "modules" };
    out.push_str(&format!("Resolved {} {noun}\n", outcome.modules.len()));
    for rm in &outcome.modules {
        let module = &rm.module;
        let marker = if module.is_local() {
            " (local)"
        } else if module.is_mutable() {
            " (branch)"
        } else {
            ""
        };
        out.push_str(&format!("  {}@{}{marker}\n", module.name(), module.version()));
        if let Some(files) = outcome.files.iter().find(|f| f.module == module.name()) {
            for file in files.fs.files() {
                out.push_str(&format!("    {}\n", file.display()));
            }
        }
    }
    if let Some(path) = &outcome.lockfile_written {
        out.push_str(&format!("Wrote {}\n", path.display()));
    }
    out
}

pub(crate) fn render_json(outcome: &ResolveOutcome) -> serde_json::Value {
    let modules: Vec<serde_json::Value> = outcome
        .modules
        .iter()
        .map(|rm| {
            let files = outcome
                .files
                .iter()
                .find(|f| f.module == rm.name())
                .map(|f| {
                    f.fs.files()
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                });
            serde_json::json!({
                "name": rm.name(),
                "url": rm.module.uri(),
                "version": rm.module.version().tag,
                "mutable": rm.module.is_mutable(),
                "files": files,
            })
        })
        .collect();

    serde_json::json!({
        "event": "resolve",
        "modules": modules,
        "warnings": outcome.warnings,
        "reproducible": outcome.is_reproducible(),
        "lockfile": outcome.lockfile_written.as_ref().map(|p| p.display().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quarry::domain::entities::{Module, ModuleManifest, ResolvedModule};
    use quarry::domain::value_objects::Version;

    use super::*;

    fn resolved(name: &str, uri: &str, version: Version) -> ResolvedModule {
        ResolvedModule {
            module: Module::new(name, uri, version),
            manifest: Arc::new(ModuleManifest::new(name)),
        }
    }

    fn outcome() -> ResolveOutcome {
        ResolveOutcome {
            modules: vec![
                resolved("github.com/org/base", "https://github.com/org/base", Version::tag("v1.2.0")),
                resolved("github.com/org/lint", "https://github.com/org/lint", Version::branch("main")),
                resolved("github.com/org/ci", "file:///work/ci", Version::local()),
            ],
            ..ResolveOutcome::default()
        }
    }

    #[test]
    fn text_output_marks_mutable_versions() {
        insta::assert_snapshot!(render_text(&outcome()), @r"
        Resolved 3 modules
          github.com/org/base@v1.2.0
          github.com/org/lint@main (branch)
          github.com/org/ci@local (local)
        ");
    }

    #[test]
    fn json_output_lists_modules() {
        let value = render_json(&outcome());
        assert_eq!(value["event"], "resolve");
        assert_eq!(value["reproducible"], false);
        assert_eq!(value["modules"][0]["version"], "v1.2.0");
        assert_eq!(value["modules"][1]["mutable"], true);
        assert!(value["lockfile"].is_null());
    }

    #[test]
    fn project_root_of_bare_manifest_is_cwd() {
        assert_eq!(project_root(Path::new("quarry.yaml")), PathBuf::from("."));
        assert_eq!(project_root(Path::new("svc/quarry.yaml")), PathBuf::from("svc"));
    }
}
