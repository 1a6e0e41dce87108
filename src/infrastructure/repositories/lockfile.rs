//! YAML Lockfile Repository
//!
//! Implements the LockfileRepository port using YAML (`quarry.lock`).

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{LockedFile, LockedModule, Lockfile};
use crate::domain::ports::{LockfileError, LockfileRepository};
use crate::infrastructure::fs::atomic_write;

/// YAML-based lockfile repository
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlLockfileRepository;

impl YamlLockfileRepository {
    pub fn new() -> Self {
        Self
    }
}

/// YAML representation of a locked module
#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlModule {
    name: String,
    url: String,
    version: String,
}

/// YAML representation of a generated file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlFile {
    name: String,
    template: String,
    module: String,
}

/// YAML representation of the lockfile
#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlLockfile {
    /// Version of quarry that wrote the file
    version: String,
    generated: DateTime<Utc>,
    #[serde(default)]
    modules: Vec<YamlModule>,
    #[serde(default)]
    files: Vec<YamlFile>,
}

/// Parse lockfile content.
pub fn parse_lockfile(content: &str) -> Result<Lockfile, serde_yaml_ng::Error> {
    let doc: YamlLockfile = serde_yaml_ng::from_str(content)?;

    let mut lockfile = Lockfile::new(doc.version, doc.generated);
    for module in doc.modules {
        lockfile.push_module(LockedModule::new(module.name, module.url, module.version));
    }
    for file in doc.files {
        lockfile.push_file(LockedFile {
            name: file.name,
            template: file.template,
            module: file.module,
        });
    }
    Ok(lockfile)
}

/// Render a lockfile as YAML.
pub fn render_lockfile(lockfile: &Lockfile) -> Result<String, serde_yaml_ng::Error> {
    let doc = YamlLockfile {
        version: lockfile.tool_version().to_string(),
        generated: lockfile.generated(),
        modules: lockfile
            .modules()
            .iter()
            .map(|m| YamlModule {
                name: m.name.clone(),
                url: m.url.clone(),
                version: m.version.clone(),
            })
            .collect(),
        files: lockfile
            .files()
            .iter()
            .map(|f| YamlFile {
                name: f.name.clone(),
                template: f.template.clone(),
                module: f.module.clone(),
            })
            .collect(),
    };
    serde_yaml_ng::to_string(&doc)
}

impl LockfileRepository for YamlLockfileRepository {
    fn load(&self, path: &Path) -> Result<Option<Lockfile>, LockfileError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(LockfileError::Io {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };

        parse_lockfile(&content)
            .map(Some)
            .map_err(|e| LockfileError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    fn save(&self, lockfile: &Lockfile, path: &Path) -> Result<(), LockfileError> {
        let content = render_lockfile(lockfile).map_err(|e| LockfileError::Serialize {
            message: e.to_string(),
        })?;
        atomic_write(path, content.as_bytes()).map_err(|e| LockfileError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::tempdir;

    use super::*;

    fn sample() -> Lockfile {
        let generated = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut lockfile = Lockfile::new("0.4.0", generated);
        lockfile.push_module(LockedModule::new(
            "github.com/org/base",
            "https://github.com/org/base",
            "v1.4.0",
        ));
        lockfile.push_file(LockedFile {
            name: "README.md".to_string(),
            template: "README.md.tpl".to_string(),
            module: "github.com/org/base".to_string(),
        });
        lockfile
    }

    #[test]
    fn missing_lockfile_is_none() {
        let dir = tempdir().unwrap();
        let repo = YamlLockfileRepository::new();
        assert!(repo.load(&dir.path().join("quarry.lock")).unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quarry.lock");
        let repo = YamlLockfileRepository::new();

        repo.save(&sample(), &path).unwrap();
        let loaded = repo.load(&path).unwrap().unwrap();

        assert_eq!(loaded, sample());
    }

    #[test]
    fn rendered_layout() {
        insta::assert_snapshot!(render_lockfile(&sample()).unwrap(), @r"
        version: 0.4.0
        generated: 2026-03-01T12:00:00Z
        modules:
        - name: github.com/org/base
          url: https://github.com/org/base
          version: v1.4.0
        files:
        - name: README.md
          template: README.md.tpl
          module: github.com/org/base
        ");
    }

    #[test]
    fn reads_lockfile_without_files_section() {
        let lockfile = parse_lockfile(
            "version: 0.3.1\ngenerated: 2025-11-02T08:30:00Z\nmodules:\n- name: a\n  url: https://a\n  version: v2.0.0\n",
        )
        .unwrap();

        assert_eq!(lockfile.tool_version(), "0.3.1");
        assert_eq!(lockfile.module("a").unwrap().version, "v2.0.0");
        assert!(lockfile.files().is_empty());
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quarry.lock");
        fs::write(&path, "modules: [").unwrap();

        let err = YamlLockfileRepository::new().load(&path).unwrap_err();
        assert!(matches!(err, LockfileError::Parse { .. }));
    }
}
