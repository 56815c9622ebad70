use super::{json_pretty, EXIT_SUCCESS};
use sapic_core::{run_pipeline, PipelineConfig};
use sapic_remote::{PublishPolicy, PublishTarget};
use std::path::Path;

pub fn run(
    path: &Path,
    targets: Vec<PublishTarget>,
    output_dir: &Path,
    keep_going: bool,
    json: bool,
) -> Result<u8, String> {
    let policy = if keep_going {
        PublishPolicy::AttemptAll
    } else {
        PublishPolicy::FailFast
    };
    let config = PipelineConfig {
        output_dir: output_dir.to_path_buf(),
        targets,
        policy,
    };

    let result = run_pipeline(path, &config)
        .map_err(|e| format!("{e} (extension {})", path.display()))?;

    if json {
        println!("{}", json_pretty(&result)?);
    } else {
        println!(
            "published {}@{} ({})",
            result.identifier,
            result.version,
            result.artifact_path.display()
        );
        for outcome in &result.outcomes {
            println!(
                "  {} -> HTTP {}",
                outcome.target,
                outcome.status.unwrap_or_default()
            );
        }
    }
    Ok(EXIT_SUCCESS)
}
