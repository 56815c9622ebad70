use crate::manifest::ExtensionManifest;
use crate::semver::{SemanticVersion, VersionError};
use serde::{Deserialize, Serialize};

/// Flattened, registry-facing projection of an [`ExtensionManifest`].
///
/// Serialized as the `metadata` part of a publish request. The registry
/// indexes versions by integer triple, hence the six flattened fields
/// instead of the raw version strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublishMetadata {
    pub external_id: String,
    pub name: String,
    pub authors: Vec<String>,
    pub description: String,
    pub repository: String,
    pub ver_major: u64,
    pub ver_minor: u64,
    pub ver_patch: u64,
    pub min_app_major: u64,
    pub min_app_minor: u64,
    pub min_app_patch: u64,
}

impl PublishMetadata {
    /// Derive publish metadata from a loaded manifest, validating both
    /// version fields independently. The two versions are never compared
    /// to each other.
    pub fn derive(manifest: &ExtensionManifest) -> Result<Self, VersionError> {
        let version = SemanticVersion::parse(&manifest.version)?;
        let min_app = SemanticVersion::parse(&manifest.min_app_version)?;
        Ok(Self {
            external_id: manifest.identifier.clone(),
            name: manifest.name.clone(),
            authors: manifest.authors.clone(),
            description: manifest.description.clone(),
            repository: manifest.repository.clone(),
            ver_major: version.major,
            ver_minor: version.minor,
            ver_patch: version.patch,
            min_app_major: min_app.major,
            min_app_minor: min_app.minor,
            min_app_patch: min_app.patch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_manifest() -> ExtensionManifest {
        ExtensionManifest {
            identifier: "x.y".to_owned(),
            name: "XY".to_owned(),
            version: "1.2.3".to_owned(),
            min_app_version: "0.9.0".to_owned(),
            authors: vec!["Ada".to_owned()],
            description: "desc".to_owned(),
            repository: "https://example.com/xy".to_owned(),
            contributes: BTreeMap::new(),
        }
    }

    #[test]
    fn derives_flattened_version_triples() {
        let meta = PublishMetadata::derive(&sample_manifest()).expect("should derive");
        assert_eq!(meta.external_id, "x.y");
        assert_eq!(
            (meta.ver_major, meta.ver_minor, meta.ver_patch),
            (1, 2, 3)
        );
        assert_eq!(
            (meta.min_app_major, meta.min_app_minor, meta.min_app_patch),
            (0, 9, 0)
        );
    }

    #[test]
    fn invalid_version_fails_with_offending_string() {
        let mut manifest = sample_manifest();
        manifest.version = "1.2".to_owned();
        let err = PublishMetadata::derive(&manifest).unwrap_err();
        assert_eq!(err, VersionError::Invalid("1.2".to_owned()));
    }

    #[test]
    fn invalid_min_app_version_fails() {
        let mut manifest = sample_manifest();
        manifest.min_app_version = "0.9.0-beta".to_owned();
        assert!(PublishMetadata::derive(&manifest).is_err());
    }

    #[test]
    fn serializes_with_camel_case_wire_keys() {
        let meta = PublishMetadata::derive(&sample_manifest()).unwrap();
        let json = serde_json::to_value(&meta).unwrap();
        let object = json.as_object().unwrap();
        for key in [
            "externalId",
            "name",
            "authors",
            "description",
            "repository",
            "verMajor",
            "verMinor",
            "verPatch",
            "minAppMajor",
            "minAppMinor",
            "minAppPatch",
        ] {
            assert!(object.contains_key(key), "missing wire key {key}");
        }
        assert_eq!(object.len(), 11);
        assert_eq!(json["verPatch"], 3);
        assert_eq!(json["minAppMinor"], 9);
    }
}
