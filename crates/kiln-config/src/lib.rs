//! Configuration for the kiln asset task runner.
//!
//! A [`Config`] is an immutable record of every path and setting the build,
//! watch and serve tasks need. It is loaded once at startup (see
//! [`Config::load`]) and handed to each component explicitly, so several
//! independent configurations can live in the same process.

pub mod config;
pub mod defaults;
pub mod error;
pub mod loading;
pub mod validation;

pub use config::*;
pub use error::{ConfigError, Result};
pub use loading::{CONFIG_FILE_NAME, ENV_PREFIX};
