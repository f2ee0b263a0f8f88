//! Command-line interface definition.
//!
//! `kiln [OPTIONS] [TASK]` runs exactly one task; without a task it prints
//! the task listing.

mod task;
mod tests;

use std::path::PathBuf;

use clap::Parser;

pub use task::Task;

/// Kiln - build, watch and serve static site assets
#[derive(Parser, Debug)]
#[command(
    name = "kiln",
    version,
    about = "Build, watch and serve static site assets",
    long_about = "Kiln compiles and minifies stylesheets and scripts into a distribution\n\
                  directory, rebuilds them when sources change, pushes live reload\n\
                  notifications to the browser and serves the result over HTTP."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file, relative to the project root (defaults to kiln.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root; globs and the distribution directory resolve against it
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Task to run
    #[arg(value_enum, default_value_t = Task::Help)]
    pub task: Task,
}
