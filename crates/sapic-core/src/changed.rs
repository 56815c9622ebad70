use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Extensions live as subdirectories of this prefix in the monorepo.
pub const EXTENSIONS_PREFIX: &str = "extensions/";

#[derive(Debug, Error)]
pub enum ChangedError {
    #[error("failed to execute git: {0}")]
    Io(#[from] std::io::Error),
    #[error("git diff failed: {0}")]
    Git(String),
}

/// List the extension directories touched between `base` and `HEAD`,
/// in first-seen order. CI uses this to fan the publish pipeline out
/// over only the extensions that changed.
pub fn changed_extensions(repo_root: &Path, base: &str) -> Result<Vec<PathBuf>, ChangedError> {
    let output = Command::new("git")
        .args(["diff", "--name-only", base, "HEAD"])
        .current_dir(repo_root)
        .output()?;
    if !output.status.success() {
        return Err(ChangedError::Git(
            String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        ));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let roots = extension_roots(stdout.lines());
    debug!("{} changed extension(s) since {base}", roots.len());
    Ok(roots)
}

/// Reduce changed file paths to unique top-level extension directories.
fn extension_roots<'a>(paths: impl Iterator<Item = &'a str>) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    for path in paths {
        let Some(rest) = path.strip_prefix(EXTENSIONS_PREFIX) else {
            continue;
        };
        let Some(dir) = rest.split('/').next().filter(|s| !s.is_empty()) else {
            continue;
        };
        let root = Path::new(EXTENSIONS_PREFIX).join(dir);
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots
}
