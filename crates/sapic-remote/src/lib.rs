//! Registry publication for Sapic extension artifacts.
//!
//! This crate provides publish target configuration (URL plus optional
//! bearer token), the multipart `POST /publish` client, per-target
//! outcomes, and the explicit multi-target sequencing policy.

pub mod config;
pub mod publish;

pub use config::{load_targets, PublishTarget};
pub use publish::{publish_all, PublishOutcome, PublishPolicy, Publisher, PUBLISH_PATH};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("target config error: {0}")]
    Config(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("transport error for '{target}': {cause}")]
    Transport { target: String, cause: String },
}
