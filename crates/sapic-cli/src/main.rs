mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_FAILURE, EXIT_MANIFEST_ERROR, EXIT_PACKAGE_ERROR, EXIT_PUBLISH_ERROR};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "sapic-ci",
    version,
    about = "Package Sapic extensions and publish them to registries"
)]
struct Cli {
    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build an extension artifact and publish it to every configured registry.
    Publish {
        /// Path to the extension directory (containing Sapic.json).
        path: PathBuf,
        /// Registry base URL; repeat for multiple targets, publication
        /// follows the given order. Falls back to $REGISTRY_URL.
        #[arg(long = "registry")]
        registries: Vec<String>,
        /// JSON file declaring an ordered list of publish targets.
        #[arg(long)]
        targets: Option<PathBuf>,
        /// Directory the artifact is written into.
        #[arg(long, default_value = "build")]
        output_dir: PathBuf,
        /// Attempt every target instead of stopping at the first failure.
        #[arg(long, default_value_t = false)]
        keep_going: bool,
    },
    /// Build an extension artifact without publishing.
    Build {
        /// Path to the extension directory.
        path: PathBuf,
        /// Directory the artifact is written into.
        #[arg(long, default_value = "build")]
        output_dir: PathBuf,
    },
    /// Validate an extension manifest and its version fields.
    Validate {
        /// Path to the extension directory.
        path: PathBuf,
    },
    /// List extension directories changed since a base revision.
    Changed {
        /// Base commit to compare against.
        base: String,
        /// Repository root to run the comparison in.
        #[arg(long, default_value = ".")]
        repo: PathBuf,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("SAPIC_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .init();

    // The only ambient state reads; everything downstream gets explicit config.
    let token = std::env::var("SAPIC_REGISTRY_TOKEN").ok();
    let fallback_url = std::env::var("REGISTRY_URL").ok();
    let json_output = cli.json;

    let result = match cli.command {
        Commands::Publish {
            path,
            registries,
            targets,
            output_dir,
            keep_going,
        } => commands::resolve_targets(
            &registries,
            targets.as_deref(),
            fallback_url.as_deref(),
            token.as_deref(),
        )
        .and_then(|targets| {
            commands::publish::run(&path, targets, &output_dir, keep_going, json_output)
        }),
        Commands::Build { path, output_dir } => {
            commands::build::run(&path, &output_dir, json_output)
        }
        Commands::Validate { path } => commands::validate::run(&path, json_output),
        Commands::Changed { base, repo } => commands::changed::run(&repo, &base, json_output),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("manifest error:") || msg.starts_with("version error:") {
                EXIT_MANIFEST_ERROR
            } else if msg.starts_with("package error:") {
                EXIT_PACKAGE_ERROR
            } else if msg.starts_with("publish error:") {
                EXIT_PUBLISH_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
