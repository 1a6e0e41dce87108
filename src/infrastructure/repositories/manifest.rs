//! YAML manifest parsing
//!
//! - Root manifest (`quarry.yaml`): what the project wants
//! - Module manifest (`manifest.yaml`): what a module needs and declares
//!
//! Argument schemas are checked here, so a manifest with an unknown argument
//! type never reaches the resolver.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml_ng::Value;

use crate::domain::entities::{
    ModuleManifest, ModuleRef, PostRunCommand, RootManifest, LOCAL_SCHEME,
};
use crate::domain::value_objects::{Argument, ArgumentError, ArgumentType};

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("invalid manifest: {message}")]
    Parse { message: String },

    #[error(transparent)]
    Argument(#[from] ArgumentError),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleRefDoc {
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    channel: String,
    #[serde(default)]
    prerelease: bool,
}

impl From<ModuleRefDoc> for ModuleRef {
    fn from(doc: ModuleRefDoc) -> Self {
        ModuleRef::new(doc.name)
            .with_version(doc.version)
            .with_channel(doc.channel)
            .with_prerelease(doc.prerelease)
    }
}

#[derive(Debug, Deserialize)]
struct RootManifestDoc {
    name: String,
    #[serde(default)]
    arguments: BTreeMap<String, Value>,
    #[serde(default)]
    modules: Vec<ModuleRefDoc>,
    #[serde(default)]
    replacements: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct SchemaDoc {
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArgumentDoc {
    #[serde(default)]
    description: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    schema: SchemaDoc,
    #[serde(default)]
    default: Option<Value>,
    #[serde(default)]
    from: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostRunCommandDoc {
    name: String,
    command: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleManifestDoc {
    name: String,
    #[serde(default)]
    modules: Vec<ModuleRefDoc>,
    #[serde(default)]
    arguments: BTreeMap<String, ArgumentDoc>,
    #[serde(default, rename = "postRunCommand")]
    post_run_commands: Vec<PostRunCommandDoc>,
}

/// Read and parse a root manifest; replacement paths resolve against its directory.
pub fn load_root_manifest(path: &Path) -> Result<RootManifest, ManifestError> {
    let content = fs::read_to_string(path).map_err(|e| ManifestError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_root_manifest(&content, base_dir)
}

pub fn parse_root_manifest(content: &str, base_dir: &Path) -> Result<RootManifest, ManifestError> {
    let doc: RootManifestDoc = serde_yaml_ng::from_str(content).map_err(|e| ManifestError::Parse {
        message: e.to_string(),
    })?;

    let mut manifest = RootManifest::new(doc.name);
    manifest.arguments = doc.arguments;
    manifest.modules = doc.modules.into_iter().map(ModuleRef::from).collect();
    for (module, target) in doc.replacements {
        let url = replacement_url(&target, base_dir)?;
        manifest.replacements.insert(module, url);
    }
    Ok(manifest)
}

pub fn parse_module_manifest(content: &str) -> Result<ModuleManifest, ManifestError> {
    let doc: ModuleManifestDoc =
        serde_yaml_ng::from_str(content).map_err(|e| ManifestError::Parse {
            message: e.to_string(),
        })?;

    let mut manifest = ModuleManifest::new(doc.name);
    manifest.modules = doc.modules.into_iter().map(ModuleRef::from).collect();
    for (name, arg) in doc.arguments {
        let schema = match arg.schema.kind.as_deref() {
            None => ArgumentType::default(),
            Some(kind) => ArgumentType::parse(kind).ok_or_else(|| ArgumentError::UnknownType {
                name: name.clone(),
                schema: kind.to_string(),
            })?,
        };
        let argument = Argument {
            description: arg.description,
            required: arg.required,
            schema,
            default: arg.default,
            from: arg.from,
        };
        manifest.arguments.insert(name, argument);
    }
    manifest.post_run_commands = doc
        .post_run_commands
        .into_iter()
        .map(|c| PostRunCommand {
            name: c.name,
            command: c.command,
        })
        .collect();
    Ok(manifest)
}

/// URLs are kept; anything else is a path, turned into an absolute `file://` URL.
fn replacement_url(target: &str, base_dir: &Path) -> Result<String, ManifestError> {
    if target.contains("://") {
        return Ok(target.to_string());
    }
    let joined = base_dir.join(target);
    let absolute = std::path::absolute(&joined).map_err(|e| ManifestError::Io {
        path: joined.clone(),
        message: e.to_string(),
    })?;
    Ok(format!("{LOCAL_SCHEME}{}", absolute.display()))
}
