use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixed manifest filename at the root of every extension directory.
pub const MANIFEST_FILE: &str = "Sapic.json";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("invalid manifest: {0}")]
    Field(String),
}

/// Declarative description of one extension, loaded from `Sapic.json`.
///
/// Version fields are kept as raw strings here; semver syntax is validated
/// when [`crate::PublishMetadata`] is derived, and `contributes` folder
/// existence is checked at artifact build time. Each stage validates only
/// what it consumes.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionManifest {
    pub identifier: String,
    pub name: String,
    pub version: String,
    pub min_app_version: String,
    pub authors: Vec<String>,
    pub description: String,
    pub repository: String,
    /// Capability category → relative folder path bundled into the artifact.
    pub contributes: BTreeMap<String, String>,
}

const REQUIRED_FIELDS: [&str; 8] = [
    "identifier",
    "name",
    "version",
    "minAppVersion",
    "authors",
    "description",
    "repository",
    "contributes",
];

/// Load and structurally validate the manifest under `extension_root`.
pub fn load_manifest(extension_root: impl AsRef<Path>) -> Result<ExtensionManifest, ManifestError> {
    let path = extension_root.as_ref().join(MANIFEST_FILE);
    if !path.exists() {
        return Err(ManifestError::NotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    parse_manifest_str(&content)
}

pub fn parse_manifest_str(input: &str) -> Result<ExtensionManifest, ManifestError> {
    // Two phases keep error attribution precise: malformed JSON is a parse
    // error, a well-formed document with a bad shape is a field error.
    let value: serde_json::Value = serde_json::from_str(input).map_err(ManifestError::Parse)?;
    manifest_from_value(value)
}

fn manifest_from_value(value: serde_json::Value) -> Result<ExtensionManifest, ManifestError> {
    let Some(object) = value.as_object() else {
        return Err(ManifestError::Field(
            "manifest root must be a JSON object".to_owned(),
        ));
    };
    for field in REQUIRED_FIELDS {
        if !object.contains_key(field) {
            return Err(ManifestError::Field(format!(
                "missing required field `{field}`"
            )));
        }
    }
    serde_json::from_value(value).map_err(|e| ManifestError::Field(e.to_string()))
}
