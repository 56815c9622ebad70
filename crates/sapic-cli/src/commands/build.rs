use super::{json_pretty, EXIT_SUCCESS};
use sapic_core::build_extension;
use std::path::Path;

pub fn run(path: &Path, output_dir: &Path, json: bool) -> Result<u8, String> {
    let (manifest, _, artifact) = build_extension(path, output_dir)
        .map_err(|e| format!("{e} (extension {})", path.display()))?;

    if json {
        let payload = serde_json::json!({
            "identifier": manifest.identifier,
            "version": manifest.version,
            "artifact": artifact.path,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "built {}@{} -> {}",
            manifest.identifier,
            manifest.version,
            artifact.path.display()
        );
    }
    Ok(EXIT_SUCCESS)
}
