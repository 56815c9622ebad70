pub mod build;
pub mod changed;
pub mod completions;
pub mod publish;
pub mod validate;

use sapic_remote::{load_targets, PublishTarget};
use std::path::Path;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_PACKAGE_ERROR: u8 = 3;
pub const EXIT_PUBLISH_ERROR: u8 = 4;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Assemble the ordered target list for a publish run.
///
/// Precedence: an explicit targets file, then repeated `--registry` flags,
/// then the `REGISTRY_URL` fallback. The bearer token (if any) applies to
/// flag- and env-derived targets; a targets file carries its own tokens.
pub fn resolve_targets(
    registries: &[String],
    targets_file: Option<&Path>,
    fallback_url: Option<&str>,
    token: Option<&str>,
) -> Result<Vec<PublishTarget>, String> {
    if let Some(path) = targets_file {
        if !registries.is_empty() {
            return Err("pass either --targets or --registry, not both".to_owned());
        }
        return load_targets(path).map_err(|e| e.to_string());
    }

    let urls: Vec<&str> = if registries.is_empty() {
        fallback_url.into_iter().collect()
    } else {
        registries.iter().map(String::as_str).collect()
    };
    if urls.is_empty() {
        return Err(
            "no registry configured: pass --registry, --targets, or set REGISTRY_URL".to_owned(),
        );
    }

    Ok(urls
        .into_iter()
        .map(|url| {
            let mut target = PublishTarget::new(url.trim_end_matches('/'), url);
            if let Some(token) = token {
                target = target.with_token(token);
            }
            target
        })
        .collect())
}
