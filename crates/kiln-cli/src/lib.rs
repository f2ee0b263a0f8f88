//! Kiln CLI - build, watch and serve static site assets.
//!
//! The binary runs one task per invocation. Build tasks delegate to
//! `kiln-pipeline`; `watch` ties the pieces in this crate together:
//!
//! - [`watch`] - debounced filesystem watcher and the binding router
//! - [`livereload`] - live reload actor with its SSE listener
//! - [`testing`] - external unit-test runner hook
//! - [`server`] - static file server for the distribution directory
//! - [`cli`], [`commands`] - argument parsing and task implementations
//! - [`error`], [`logger`], [`ui`] - ambient plumbing

pub mod cli;
pub mod commands;
pub mod error;
pub mod livereload;
pub mod logger;
pub mod server;
pub mod testing;
pub mod ui;
pub mod watch;

pub use error::{CliError, Result, ResultExt};
