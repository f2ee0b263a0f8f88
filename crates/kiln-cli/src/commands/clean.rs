//! `kiln clean`.

use std::sync::Arc;

use kiln_config::Config;
use kiln_pipeline::{CleanOutcome, Orchestrator};

use crate::error::Result;
use crate::ui;

/// Remove the distribution directory. Filesystem problems are reported but
/// never fail the task.
pub async fn execute(config: Arc<Config>) -> Result<()> {
    let orchestrator = Orchestrator::new(config)?;

    match orchestrator.clean().await {
        CleanOutcome::Removed(path) => ui::success(&format!("Removed {}", path.display())),
        CleanOutcome::Missing(path) => {
            ui::info(&format!("Nothing to clean at {}", path.display()))
        }
        CleanOutcome::Skipped { path, reason } => {
            ui::warning(&format!("Could not remove {}: {}", path.display(), reason))
        }
    }
    Ok(())
}
