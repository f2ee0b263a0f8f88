//! `kiln build*` tasks.

use std::sync::Arc;

use kiln_config::Config;
use kiln_pipeline::{Orchestrator, TargetReport};

use crate::error::{CliError, Result, ResultExt};
use crate::ui;

pub async fn execute(config: Arc<Config>, target: &str) -> Result<()> {
    let orchestrator = Orchestrator::new(Arc::clone(&config))?;
    if orchestrator.target(target).is_none() {
        return Err(CliError::InvalidArgument(format!(
            "{} is not available for this project",
            target
        )))
        .with_hint("set paths.partials in kiln.toml");
    }

    let spinner = ui::Spinner::new(&format!("Running {}...", target));
    match orchestrator.run_target(target).await {
        Ok(report) => {
            spinner.finish(&format!(
                "{} completed in {}",
                target,
                ui::format_duration(report.elapsed)
            ));
            ui::print_build_summary(&summary_entries(&config, &report), report.elapsed);
            Ok(())
        }
        Err(e) => {
            spinner.fail(&format!("{} failed", target));
            Err(e.into())
        }
    }
}

/// `(path relative to dist, bytes, stage time)` for every written file.
fn summary_entries(
    config: &Config,
    report: &TargetReport,
) -> Vec<(String, u64, std::time::Duration)> {
    let dist = config.dist_dir();
    report
        .stages
        .iter()
        .flat_map(|stage| {
            stage.files.iter().map(|file| {
                let name = file
                    .path
                    .strip_prefix(&dist)
                    .unwrap_or(&file.path)
                    .display()
                    .to_string();
                (name, file.bytes, stage.elapsed)
            })
        })
        .collect()
}
