//! Watch bindings and the router that fires them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kiln_config::{Config, ConfigError};
use kiln_pipeline::Orchestrator;
use kiln_pipeline::orchestrator::names;
use kiln_pipeline::sources::MATCH_OPTIONS;
use tokio::task::JoinHandle;

use crate::error::{CliError, Result};
use crate::livereload::LiveReload;
use crate::testing::TestRunnerHook;
use crate::ui;

/// What a binding does when one of its patterns matches.
///
/// Every action other than `Notify` is followed by a live reload
/// notification for the matched paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchAction {
    Notify,
    RunTarget(String),
    RunTests,
}

/// A named set of path patterns tied to an action.
#[derive(Debug, Clone)]
pub struct WatchBinding {
    pub name: String,
    pub action: WatchAction,
    patterns: Vec<glob::Pattern>,
}

impl WatchBinding {
    /// `patterns` are absolute globs, usually from [`Config::resolve_glob`].
    pub fn new(
        name: impl Into<String>,
        patterns: &[String],
        action: WatchAction,
    ) -> std::result::Result<Self, glob::PatternError> {
        let patterns = patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            name: name.into(),
            action,
            patterns,
        })
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_path_with(path, MATCH_OPTIONS))
    }
}

/// The collaborators a binding's action may need.
#[derive(Clone)]
struct Actions {
    orchestrator: Arc<Orchestrator>,
    tests: Option<Arc<TestRunnerHook>>,
    reload: LiveReload,
}

impl Actions {
    async fn fire(&self, binding: &str, action: &WatchAction, paths: Vec<PathBuf>) {
        match action {
            WatchAction::Notify => {}
            WatchAction::RunTarget(target) => self.run_target(binding, target).await,
            WatchAction::RunTests => self.run_tests(binding).await,
        }
        self.reload.changed(paths);
    }

    async fn run_target(&self, binding: &str, target: &str) {
        match self.orchestrator.run_target(target).await {
            Ok(report) => ui::success(&format!(
                "{} rebuilt {} ({} files in {})",
                binding,
                target,
                report.file_count(),
                ui::format_duration(report.elapsed)
            )),
            Err(e) => {
                tracing::error!(binding, target, error = %e, "watch build failed");
                ui::error(&format!("{} failed: {}", target, e));
            }
        }
    }

    async fn run_tests(&self, binding: &str) {
        let Some(hook) = &self.tests else {
            tracing::warn!(binding, "no test runner configured");
            return;
        };
        match hook.run().await {
            Ok(report) if report.passed() => {
                ui::success(&format!("tests passed in {}", ui::format_duration(report.elapsed)))
            }
            Ok(report) => ui::warning(&format!("{} test(s) failed", report.failures)),
            Err(e) => {
                tracing::error!(binding, error = %e, "test suite did not run");
                ui::error(&format!("test suite did not run: {}", e));
            }
        }
    }
}

/// Routes change batches to the bindings whose patterns match.
pub struct WatchRouter {
    bindings: Vec<WatchBinding>,
    actions: Actions,
}

impl WatchRouter {
    pub fn new(
        bindings: Vec<WatchBinding>,
        orchestrator: Arc<Orchestrator>,
        tests: Option<Arc<TestRunnerHook>>,
        reload: LiveReload,
    ) -> Self {
        Self {
            bindings,
            actions: Actions {
                orchestrator,
                tests,
                reload,
            },
        }
    }

    /// Build the standard bindings for `config`.
    ///
    /// The readme, meta, partials and test bindings only exist when their
    /// paths are configured.
    pub fn from_config(
        config: &Config,
        orchestrator: Arc<Orchestrator>,
        tests: Option<Arc<TestRunnerHook>>,
        reload: LiveReload,
    ) -> Result<Self> {
        let bindings = standard_bindings(config)?;
        Ok(Self::new(bindings, orchestrator, tests, reload))
    }

    pub fn bindings(&self) -> &[WatchBinding] {
        &self.bindings
    }

    /// Bindings matching at least one of `paths`, with the paths they matched.
    pub fn matches(&self, paths: &[PathBuf]) -> Vec<(&WatchBinding, Vec<PathBuf>)> {
        self.bindings
            .iter()
            .filter_map(|binding| {
                let matched: Vec<PathBuf> = paths
                    .iter()
                    .filter(|path| binding.matches(path))
                    .cloned()
                    .collect();
                (!matched.is_empty()).then_some((binding, matched))
            })
            .collect()
    }

    /// Fire every matching binding on its own task.
    ///
    /// Returns the task handles; the watch loop drops them, tests await them.
    pub fn dispatch(&self, paths: Vec<PathBuf>) -> Vec<JoinHandle<()>> {
        self.matches(&paths)
            .into_iter()
            .map(|(binding, matched)| {
                tracing::info!(binding = %binding.name, paths = matched.len(), "watch binding fired");
                let actions = self.actions.clone();
                let name = binding.name.clone();
                let action = binding.action.clone();
                tokio::spawn(async move { actions.fire(&name, &action, matched).await })
            })
            .collect()
    }
}

fn standard_bindings(config: &Config) -> Result<Vec<WatchBinding>> {
    let paths = &config.paths;
    let mut specs: Vec<(&str, Vec<String>, WatchAction)> = vec![(
        "watch-styles",
        vec![paths.styles.clone()],
        WatchAction::RunTarget(names::BUILD_CSS_DEVELOPMENT.to_string()),
    )];

    if let Some(readme) = &paths.readme {
        specs.push(("watch-readme", vec![literal(readme)], WatchAction::Notify));
    }
    if let Some(meta) = &paths.meta {
        specs.push(("watch-meta", vec![literal(meta)], WatchAction::Notify));
    }
    if let Some(partials) = &paths.partials {
        specs.push(("watch-partials", vec![partials.clone()], WatchAction::Notify));
    }
    if let Some(test) = &config.test {
        let mut patterns = vec![test.files.clone()];
        if let Some(file) = &test.config_file {
            patterns.push(literal(file));
        }
        specs.push(("watch-tests", patterns, WatchAction::RunTests));
    }
    specs.push((
        "watch-pages",
        vec![paths.pages.clone()],
        WatchAction::RunTarget(names::BUILD_INDEX.to_string()),
    ));

    specs
        .into_iter()
        .map(|(name, patterns, action)| {
            let resolved: Vec<String> = patterns.iter().map(|p| config.resolve_glob(p)).collect();
            WatchBinding::new(name, &resolved, action).map_err(|e| {
                CliError::from(ConfigError::InvalidValue {
                    field: name.to_string(),
                    value: patterns.join(", "),
                    hint: e.msg.to_string(),
                })
            })
        })
        .collect()
}

/// A literal path as a glob that only matches itself.
fn literal(path: &Path) -> String {
    glob::Pattern::escape(&path.to_string_lossy())
}
