//! Miette report conversion for CLI errors.

use kiln_pipeline::PipelineError;
use miette::Report;

use crate::error::CliError;

/// Convert a [`CliError`] into a miette report for `main`.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Pipeline(e) => pipeline_error_to_miette(e),
        CliError::Config(e) => miette::miette!(
            help = "Check kiln.toml and any KILN_* environment variables",
            "Configuration error: {}",
            e
        ),
        CliError::Server(msg) => miette::miette!(
            help = "Is another process already listening on that address?",
            "Server error: {}",
            msg
        ),
        _ => miette::miette!("{}", err),
    }
}

/// One line per failing stage, so multi-stage failures stay readable.
pub fn pipeline_error_to_miette(err: PipelineError) -> Report {
    match err {
        PipelineError::TargetFailed { target, failures } => {
            let lines: Vec<String> = failures
                .iter()
                .map(|f| format!("  {}: {}", f.stage, f.error))
                .collect();
            miette::miette!(
                "Target '{}' failed in {} stage(s):\n{}",
                target,
                failures.len(),
                lines.join("\n")
            )
        }
        PipelineError::UnknownTarget(name) => miette::miette!(
            help = "Run `kiln help` to list the available tasks",
            "Unknown target '{}'",
            name
        ),
        other => miette::miette!("{}", other),
    }
}
