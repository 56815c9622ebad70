use super::{json_pretty, EXIT_SUCCESS};
use sapic_core::validate_extension;
use std::path::Path;

pub fn run(path: &Path, json: bool) -> Result<u8, String> {
    let (manifest, metadata) = validate_extension(path)
        .map_err(|e| format!("{e} (extension {})", path.display()))?;

    if json {
        let payload = serde_json::json!({
            "identifier": manifest.identifier,
            "version": manifest.version,
            "minAppVersion": manifest.min_app_version,
            "metadata": metadata,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "ok: {}@{} (minAppVersion {})",
            manifest.identifier, manifest.version, manifest.min_app_version
        );
    }
    Ok(EXIT_SUCCESS)
}
