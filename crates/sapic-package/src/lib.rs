//! Deterministic artifact construction for Sapic extensions.
//!
//! Packs the manifest's declared contribution folders plus the manifest
//! file itself into a gzip-compressed tar archive with a stable entry
//! order, ready for registry publication.

pub mod builder;

pub use builder::{build_artifact, Artifact, ARCHIVE_SUFFIX};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("contribution folder does not exist: {0}")]
    MissingContribution(PathBuf),
    #[error("cannot derive artifact name from extension root: {0}")]
    InvalidRoot(PathBuf),
}
