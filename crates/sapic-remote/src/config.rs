use crate::RemoteError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One configured registry endpoint.
///
/// A run holds an ordered, non-empty list of these; the token is attached
/// as a bearer authorization header only when present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishTarget {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl PublishTarget {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_owned(),
            url: url.trim_end_matches('/').to_owned(),
            token: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_owned());
        self
    }
}

/// Load an ordered target list from a JSON file (an array of targets).
/// Declaration order is publication order.
pub fn load_targets(path: &Path) -> Result<Vec<PublishTarget>, RemoteError> {
    let content = std::fs::read_to_string(path)?;
    let mut targets: Vec<PublishTarget> = serde_json::from_str(&content)
        .map_err(|e| RemoteError::Config(format!("invalid targets file: {e}")))?;
    if targets.is_empty() {
        return Err(RemoteError::Config(
            "targets file declares no targets".to_owned(),
        ));
    }
    for target in &mut targets {
        target.url = target.url.trim_end_matches('/').to_owned();
    }
    Ok(targets)
}
