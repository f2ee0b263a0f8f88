//! Task implementations.
//!
//! - [`build`] - run one build target and print the summary
//! - [`clean`] - remove the distribution directory
//! - [`serve`] - static file server
//! - [`watch`] - watch bindings, live reload and the static file server
//! - [`help`] - task listing

pub mod build;
pub mod clean;
pub mod help;
pub mod serve;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use kiln_config::Config;

use crate::cli::{Cli, Task};
use crate::error::{Result, ResultExt};

/// Run the task selected on the command line.
pub async fn execute(cli: Cli) -> Result<()> {
    if cli.task == Task::Help {
        help::execute();
        return Ok(());
    }

    let config = load_config(cli.cwd.as_deref(), cli.config.as_deref())?;

    match cli.task {
        Task::Watch => watch::execute(config).await,
        Task::Clean => clean::execute(config).await,
        Task::Serve => serve::execute(config).await,
        Task::Help => Ok(()),
        task => match task.target() {
            Some(target) => build::execute(config, target).await,
            None => Ok(()),
        },
    }
}

/// Resolve the project root and load its configuration.
///
/// The root is canonicalized so watcher events, which carry absolute paths,
/// line up with the configured globs.
pub fn load_config(
    cwd: Option<&std::path::Path>,
    explicit: Option<&std::path::Path>,
) -> Result<Arc<Config>> {
    let root = match cwd {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let root: PathBuf = std::fs::canonicalize(&root).with_path(&root)?;

    let config = Config::load(&root, explicit)?;
    config.validate()?;
    Ok(Arc::new(config))
}
