use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid semver '{0}': expected MAJOR.MINOR.PATCH")]
    Invalid(String),
}

/// A validated `major.minor.patch` version triple.
///
/// The accepted grammar is stricter than full Semantic Versioning: exactly
/// three dot-separated numeric components, no pre-release or build suffix,
/// and no leading zeros (`0` itself is allowed). Registries index versions
/// by the integer triple, so anything outside that grammar is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemanticVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string against the strict grammar
    /// `^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)$`.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let invalid = || VersionError::Invalid(input.to_owned());

        let mut components = [0u64; 3];
        let parts: Vec<&str> = input.split('.').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        for (slot, part) in components.iter_mut().zip(&parts) {
            *slot = parse_component(part).ok_or_else(invalid)?;
        }
        Ok(Self {
            major: components[0],
            minor: components[1],
            patch: components[2],
        })
    }
}

/// A single numeric component: `0`, or a digit run with no leading zero.
fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if part.len() > 1 && part.starts_with('0') {
        return None;
    }
    part.parse().ok()
}

impl FromStr for SemanticVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
