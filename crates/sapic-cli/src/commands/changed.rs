use super::{json_pretty, EXIT_SUCCESS};
use sapic_core::changed_extensions;
use std::path::Path;

pub fn run(repo: &Path, base: &str, json: bool) -> Result<u8, String> {
    let roots = changed_extensions(repo, base).map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(&roots)?);
    } else {
        for root in &roots {
            println!("{}", root.display());
        }
    }
    Ok(EXIT_SUCCESS)
}
