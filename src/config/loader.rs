//! Configuration loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::types::Config;

const PROJECT_CONFIG: &str = ".quarry/config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{suggestion}'?)")?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_with_warnings(&content, path)
}

pub(super) fn parse_with_warnings(
    content: &str,
    path: &Path,
) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG)
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("quarry").join("config.toml"))
}

/// Load the first config found: `explicit`, then project, then user; defaults
/// when none exists. Environment overrides are applied on top.
///
/// An explicit path must exist; the discovered ones are optional.
pub fn load(
    explicit: Option<&Path>,
    project_root: &Path,
) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => [Some(project_config_path(project_root)), user_config_path()]
            .into_iter()
            .flatten()
            .find(|path| path.is_file()),
    };

    let (config, warnings) = match candidate {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_with_warnings(&path)?
        }
        None => (Config::default(), Vec::new()),
    };
    Ok((with_env_overrides(config), warnings))
}

/// Apply environment variable overrides (QUARRY_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_env_overrides_from(config, |name| std::env::var(name).ok())
}

/// Apply overrides read through `get_env`; unparsable values are ignored with a warning.
pub fn with_env_overrides_from<F>(mut config: Config, get_env: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = get_env("QUARRY_CONCURRENCY") {
        match value.trim().parse::<usize>() {
            Ok(n) if n > 0 => config.resolver.concurrency = Some(n),
            _ => warn!(value = %value, "ignoring invalid QUARRY_CONCURRENCY"),
        }
    }

    if let Some(value) = get_env("QUARRY_ALLOW_MAJOR_VERSION_UPGRADES") {
        config.resolver.allow_major_version_upgrades = is_truthy(&value);
    }

    if let Some(dir) = get_env("QUARRY_CACHE_DIR").filter(|v| !v.is_empty()) {
        config.cache.dir = Some(PathBuf::from(dir));
    }

    if let Some(value) = get_env("QUARRY_CACHE_TTL") {
        match value.trim().parse::<u64>() {
            Ok(secs) => config.cache.ttl_secs = secs,
            Err(_) => warn!(value = %value, "ignoring invalid QUARRY_CACHE_TTL"),
        }
    }

    if let Some(value) = get_env("QUARRY_NO_CACHE") {
        if is_truthy(&value) {
            config.cache.enabled = false;
        }
    }

    if let Some(root) = get_env("QUARRY_REGISTRY").filter(|v| !v.is_empty()) {
        config.registry.root = Some(PathBuf::from(root));
    }

    if let Some(token) = get_env("QUARRY_TOKEN").filter(|v| !v.is_empty()) {
        config.registry.token = Some(token);
    }

    config
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    !value.is_empty() && value != "false" && value != "0" && value != "no"
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "resolver",
        "concurrency",
        "allow_major_version_upgrades",
        "cache",
        "dir",
        "ttl_secs",
        "enabled",
        "registry",
        "root",
        "token",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
