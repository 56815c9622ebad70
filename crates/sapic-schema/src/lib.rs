//! Manifest parsing, semver validation, and publish metadata for Sapic extensions.
//!
//! This crate defines the schema layer: JSON manifest loading
//! (`ExtensionManifest`), strict three-component version parsing
//! (`SemanticVersion`), and the flattened registry-facing projection
//! (`PublishMetadata`) derived from a validated manifest.

pub mod manifest;
pub mod metadata;
pub mod semver;

pub use manifest::{
    load_manifest, parse_manifest_str, ExtensionManifest, ManifestError, MANIFEST_FILE,
};
pub use metadata::PublishMetadata;
pub use semver::{SemanticVersion, VersionError};
