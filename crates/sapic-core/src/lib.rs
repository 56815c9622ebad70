//! Pipeline orchestration for Sapic extension publication.
//!
//! This crate ties schema validation, artifact packaging, and registry
//! publication into `run_pipeline` — the single entry point a CI job calls
//! per extension. It also provides changed-extension detection for fanning
//! a CI run out over the extensions touched since a base revision.

pub mod changed;
pub mod pipeline;

pub use changed::{changed_extensions, ChangedError};
pub use pipeline::{build_extension, run_pipeline, validate_extension, PipelineConfig, RunResult};

use std::fmt;
use thiserror::Error;

/// Pipeline stage identity, attached to every error for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Manifest,
    Version,
    Package,
    Publish,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Manifest => "manifest",
            Stage::Version => "version",
            Stage::Package => "package",
            Stage::Publish => "publish",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("manifest error: {0}")]
    Manifest(#[from] sapic_schema::ManifestError),
    #[error("version error: {0}")]
    Version(#[from] sapic_schema::VersionError),
    #[error("package error: {0}")]
    Package(#[from] sapic_package::PackageError),
    #[error("publish error: {0}")]
    Remote(#[from] sapic_remote::RemoteError),
    #[error("publish error: target '{target}' {}: {body}", publish_status(.status))]
    Publish {
        target: String,
        status: Option<u16>,
        body: String,
    },
}

fn publish_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("returned HTTP {code}"),
        None => "was unreachable".to_owned(),
    }
}

impl PipelineError {
    /// The stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Manifest(_) => Stage::Manifest,
            PipelineError::Version(_) => Stage::Version,
            PipelineError::Package(_) => Stage::Package,
            PipelineError::Remote(_) | PipelineError::Publish { .. } => Stage::Publish,
        }
    }
}
