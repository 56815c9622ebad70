use crate::PipelineError;
use sapic_package::{build_artifact, Artifact};
use sapic_remote::{publish_all, PublishOutcome, PublishPolicy, PublishTarget, Publisher};
use sapic_schema::{load_manifest, ExtensionManifest, PublishMetadata};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Immutable configuration for one pipeline run, assembled once at process
/// startup and threaded through the call chain. The pipeline itself never
/// reads ambient environment state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    pub targets: Vec<PublishTarget>,
    pub policy: PublishPolicy,
}

/// Result of a fully successful run: one outcome per attempted target.
#[derive(Debug, Serialize)]
pub struct RunResult {
    pub identifier: String,
    pub version: String,
    pub artifact_path: PathBuf,
    pub outcomes: Vec<PublishOutcome>,
}

/// Load and validate the manifest plus both of its version fields.
pub fn validate_extension(
    extension_root: &Path,
) -> Result<(ExtensionManifest, PublishMetadata), PipelineError> {
    let manifest = load_manifest(extension_root)?;
    let metadata = PublishMetadata::derive(&manifest)?;
    debug!(
        "validated {} {} (minAppVersion {})",
        manifest.identifier, manifest.version, manifest.min_app_version
    );
    Ok((manifest, metadata))
}

/// Validate and build the artifact without any registry interaction.
pub fn build_extension(
    extension_root: &Path,
    output_dir: &Path,
) -> Result<(ExtensionManifest, PublishMetadata, Artifact), PipelineError> {
    let (manifest, metadata) = validate_extension(extension_root)?;
    let artifact = build_artifact(&manifest, extension_root, output_dir)?;
    Ok((manifest, metadata, artifact))
}

/// Run the full pipeline for one extension: load manifest → validate both
/// versions → derive metadata → build artifact → publish to each target in
/// declared order under the configured policy.
///
/// Any stage failure short-circuits the rest and surfaces as the first
/// error, tagged with its stage. Targets already published when a later
/// target fails are not rolled back.
pub fn run_pipeline(
    extension_root: &Path,
    config: &PipelineConfig,
) -> Result<RunResult, PipelineError> {
    let (manifest, metadata, artifact) = build_extension(extension_root, &config.output_dir)?;

    let publisher = Publisher::new();
    let outcomes = publish_all(
        &publisher,
        &metadata,
        &artifact,
        &config.targets,
        config.policy,
    )?;

    if let Some(failed) = outcomes.iter().find(|o| !o.success) {
        return Err(PipelineError::Publish {
            target: failed.target.clone(),
            status: failed.status,
            body: failed.body.clone().unwrap_or_default(),
        });
    }

    info!(
        "published {} {} to {} target(s)",
        manifest.identifier,
        manifest.version,
        outcomes.len()
    );
    Ok(RunResult {
        identifier: manifest.identifier,
        version: manifest.version,
        artifact_path: artifact.path,
        outcomes,
    })
}
