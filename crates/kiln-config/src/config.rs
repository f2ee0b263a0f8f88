//! The configuration record and its sections.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults::*;
use crate::error::{ConfigError, Result};

/// Complete kiln configuration.
///
/// Every relative path is interpreted against [`Config::root`], which is set
/// by the loader and never read from the file itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub paths: PathsConfig,
    pub server: ServerConfig,
    pub livereload: LiveReloadConfig,
    pub watch: WatchConfig,
    pub styles: StylesConfig,

    /// Unit-test hook; absent unless the project opts in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<TestConfig>,

    /// Project root all relative paths resolve against.
    #[serde(skip)]
    pub root: PathBuf,

    /// Config file this record was loaded from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Input globs, bundle names and the distribution root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Glob of style sources (compiled to CSS)
    pub styles: String,

    /// File name of the production stylesheet bundle
    pub style_bundle: String,

    /// Glob of script sources
    pub scripts: String,

    /// File name of the production script bundle
    pub script_bundle: String,

    /// Glob of pages copied to the distribution root
    pub pages: String,

    /// Glob of HTML partials copied to `<dist>/partials`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partials: Option<String>,

    /// Distribution directory every artifact is written under
    pub dist: PathBuf,

    /// Documentation file that triggers a reload when edited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<PathBuf>,

    /// Build configuration file that triggers a reload when edited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            styles: default_styles(),
            style_bundle: default_style_bundle(),
            scripts: default_scripts(),
            script_bundle: default_script_bundle(),
            pages: default_pages(),
            partials: None,
            dist: default_dist(),
            readme: default_readme(),
            meta: None,
        }
    }
}

/// Static file server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

/// Live-reload listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LiveReloadConfig {
    pub host: String,
    pub port: u16,
}

impl Default for LiveReloadConfig {
    fn default() -> Self {
        Self {
            host: default_livereload_host(),
            port: default_livereload_port(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    pub debounce_ms: u64,
    pub ignore: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            ignore: default_watch_ignore(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StylesConfig {
    /// Rewrite nested rules into flat selectors for older browsers
    pub lower_nesting: bool,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            lower_nesting: default_lower_nesting(),
        }
    }
}

/// External unit-test runner invoked by the watcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestConfig {
    /// Glob of test files passed to the runner
    pub files: String,

    /// Reporter style (`--reporter`)
    pub reporter: String,

    /// Interface style (`--ui`)
    pub ui: String,

    /// Runner executable
    pub command: String,

    /// Extra arguments placed before the test files
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Runner configuration file; edits re-run the suite
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            files: default_test_files(),
            reporter: default_test_reporter(),
            ui: default_test_ui(),
            command: default_test_command(),
            args: Vec::new(),
            config_file: None,
        }
    }
}

impl Config {
    /// Default configuration rooted at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Resolve a project-relative path against the root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Resolve a glob pattern against the root, keeping it a pattern string.
    pub fn resolve_glob(&self, pattern: &str) -> String {
        if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            let root = glob::Pattern::escape(&self.root.to_string_lossy());
            format!("{}/{}", root.trim_end_matches('/'), pattern.trim_start_matches("./"))
        }
    }

    /// Absolute distribution directory.
    pub fn dist_dir(&self) -> PathBuf {
        self.resolve(&self.paths.dist)
    }

    /// Socket address of the static file server.
    pub fn server_addr(&self) -> Result<SocketAddr> {
        parse_addr("server", &self.server.host, self.server.port)
    }

    /// Socket address of the live-reload listener.
    pub fn livereload_addr(&self) -> Result<SocketAddr> {
        parse_addr("livereload", &self.livereload.host, self.livereload.port)
    }
}

fn parse_addr(section: &str, host: &str, port: u16) -> Result<SocketAddr> {
    format!("{}:{}", host, port).parse().map_err(|_| {
        ConfigError::invalid(
            format!("{}.host", section),
            host,
            "expected an IP address such as 127.0.0.1 or 0.0.0.0",
        )
    })
}
