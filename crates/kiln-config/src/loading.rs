use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};

use crate::config::Config;
use crate::error::{ConfigError, Result};

/// Conventional config file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "kiln.toml";

/// Prefix of environment overrides (`KILN_SERVER__PORT=9000`).
pub const ENV_PREFIX: &str = "KILN_";

impl Config {
    /// Load configuration from multiple sources.
    /// Priority: environment variables > config file > defaults
    ///
    /// `explicit` must exist when given; otherwise `kiln.toml` in `root` is
    /// used if present and defaults apply when it is not.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let source = match explicit {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    root.join(path)
                };
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path));
                }
                Some(path)
            }
            None => {
                let default_path = root.join(CONFIG_FILE_NAME);
                default_path.is_file().then_some(default_path)
            }
        };

        let config = Self::figment(source.as_deref()).extract::<Config>()?;
        tracing::debug!(
            root = %root.display(),
            source = ?source,
            "configuration loaded"
        );

        Ok(Self {
            root: root.to_path_buf(),
            source,
            ..config
        })
    }

    fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
