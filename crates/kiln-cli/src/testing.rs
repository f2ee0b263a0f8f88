//! External unit-test runner hook.
//!
//! The watcher re-runs the suite when test files change. A suite that ran
//! and reported failures is a normal [`SuiteReport`]; only a suite that could
//! not run at all is a [`TestHookError`]. Either way the watcher logs the
//! result and keeps looping.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use kiln_config::{Config, TestConfig};
use kiln_pipeline::sources::MATCH_OPTIONS;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum TestHookError {
    #[error("no test files match '{0}'")]
    NoTestFiles(String),

    #[error("invalid test file pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("failed to start test runner '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("test runner was terminated before reporting a result")]
    Terminated,
}

/// Outcome of a suite that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteReport {
    pub files: usize,
    /// The runner's exit status; mocha exits with its failure count.
    pub failures: u32,
    pub elapsed: Duration,
}

impl SuiteReport {
    pub fn passed(&self) -> bool {
        self.failures == 0
    }
}

#[derive(Debug, Clone)]
pub struct TestRunnerHook {
    root: PathBuf,
    pattern: String,
    absolute_pattern: String,
    settings: TestConfig,
}

impl TestRunnerHook {
    /// `None` when the configuration has no `[test]` section.
    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .test
            .as_ref()
            .map(|settings| Self::new(config, settings.clone()))
    }

    pub fn new(config: &Config, settings: TestConfig) -> Self {
        Self {
            root: config.root.clone(),
            pattern: settings.files.clone(),
            absolute_pattern: config.resolve_glob(&settings.files),
            settings,
        }
    }

    /// Test files matching the configured glob, sorted.
    pub fn test_files(&self) -> Result<Vec<PathBuf>, TestHookError> {
        let entries = glob::glob_with(&self.absolute_pattern, MATCH_OPTIONS).map_err(|e| {
            TestHookError::Pattern {
                pattern: self.pattern.clone(),
                message: e.msg.to_string(),
            }
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect();
        files.sort();
        Ok(files)
    }

    /// The full argument list passed to the runner.
    pub fn arguments(&self, files: &[PathBuf]) -> Vec<String> {
        let mut args = self.settings.args.clone();
        args.extend(files.iter().map(|f| f.to_string_lossy().to_string()));
        args.extend([
            "--reporter".to_string(),
            self.settings.reporter.clone(),
            "--ui".to_string(),
            self.settings.ui.clone(),
        ]);
        args
    }

    /// Run the suite once with inherited stdout and stderr.
    pub async fn run(&self) -> Result<SuiteReport, TestHookError> {
        let files = self.test_files()?;
        if files.is_empty() {
            return Err(TestHookError::NoTestFiles(self.pattern.clone()));
        }

        let started = Instant::now();
        tracing::debug!(command = %self.settings.command, files = files.len(), "running test suite");

        let status = Command::new(&self.settings.command)
            .args(self.arguments(&files))
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| TestHookError::Spawn {
                command: self.settings.command.clone(),
                source,
            })?;

        let code = status.code().ok_or(TestHookError::Terminated)?;
        Ok(SuiteReport {
            files: files.len(),
            failures: u32::try_from(code).unwrap_or(u32::MAX),
            elapsed: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments_order() {
        let config = Config::with_root("/project");
        let hook = TestRunnerHook::new(
            &config,
            TestConfig {
                args: vec!["--recursive".to_string()],
                ..TestConfig::default()
            },
        );

        let args = hook.arguments(&[PathBuf::from("/project/test/a.js")]);
        assert_eq!(
            args,
            vec!["--recursive", "/project/test/a.js", "--reporter", "spec", "--ui", "bdd"]
        );
    }

    #[test]
    fn test_hook_requires_test_section() {
        let config = Config::with_root("/project");
        assert!(TestRunnerHook::from_config(&config).is_none());
    }

    #[test]
    fn test_suite_report_passed() {
        let report = SuiteReport {
            files: 3,
            failures: 0,
            elapsed: Duration::ZERO,
        };
        assert!(report.passed());
        assert!(!SuiteReport { failures: 2, ..report }.passed());
    }
}
