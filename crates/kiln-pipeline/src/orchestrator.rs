//! Named build targets composed of stages.
//!
//! The orchestrator owns every [`Stage`] and [`Target`] for a project. Both
//! are defined once at construction and then run any number of times.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use kiln_config::Config;

use crate::error::{PipelineError, Result, StageFailure};
use crate::stage::{Stage, StageId, StageReport};
use crate::transform::{
    LightningStyleCompiler, LightningStyleMinifier, NewlineConcatenator, OxcScriptMinifier,
    Transform,
};

/// Stage and target names used by the standard project layout.
pub mod names {
    pub const SCRIPT_DEV: &str = "script-dev";
    pub const SCRIPT_PROD: &str = "script-prod";
    pub const STYLE_DEV: &str = "style-dev";
    pub const STYLE_PROD: &str = "style-prod";
    pub const INDEX_COPY: &str = "index-copy";
    pub const PARTIALS_COPY: &str = "partials-copy";

    pub const BUILD: &str = "build";
    pub const BUILD_DEVELOPMENT: &str = "build-development";
    pub const BUILD_JAVASCRIPT: &str = "build-javascript";
    pub const BUILD_JAVASCRIPT_DEVELOPMENT: &str = "build-javascript-development";
    pub const BUILD_JAVASCRIPT_PRODUCTION: &str = "build-javascript-production";
    pub const BUILD_CSS: &str = "build-css";
    pub const BUILD_CSS_DEVELOPMENT: &str = "build-css-development";
    pub const BUILD_CSS_PRODUCTION: &str = "build-css-production";
    pub const BUILD_INDEX: &str = "build-index";
    pub const BUILD_PARTIALS: &str = "build-partials";
}

/// A named, ordered set of stages.
#[derive(Debug, Clone)]
pub struct Target {
    pub name: String,
    pub stages: Vec<StageId>,
}

/// Outcome of a successful target run.
#[derive(Debug, Clone)]
pub struct TargetReport {
    pub target: String,
    pub stages: Vec<StageReport>,
    pub elapsed: Duration,
}

impl TargetReport {
    pub fn file_count(&self) -> usize {
        self.stages.iter().map(|s| s.files.len()).sum()
    }
}

/// Result of [`Orchestrator::clean`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanOutcome {
    Removed(PathBuf),
    /// Nothing to remove.
    Missing(PathBuf),
    /// Removal failed; the tree may be partially removed.
    Skipped { path: PathBuf, reason: String },
}

pub struct Orchestrator {
    config: Arc<Config>,
    stages: IndexMap<StageId, Arc<Stage>>,
    targets: IndexMap<String, Target>,
}

impl Orchestrator {
    /// An orchestrator with no stages or targets.
    pub fn empty(config: Arc<Config>) -> Self {
        Self {
            config,
            stages: IndexMap::new(),
            targets: IndexMap::new(),
        }
    }

    /// Define the standard stages and targets for `config`.
    ///
    /// `partials-copy` and `build-partials` only exist when the configuration
    /// names a partials glob.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        use names::*;

        let paths = config.paths.clone();
        let compiler = LightningStyleCompiler::new(config.styles.lower_nesting);
        let mut orchestrator = Self::empty(config);

        orchestrator.define_stage(
            Stage::new(SCRIPT_DEV, "javascript")?.input(paths.scripts.clone()),
        )?;
        orchestrator.define_stage(
            Stage::new(SCRIPT_PROD, "javascript")?
                .input(paths.scripts.clone())
                .transform(Transform::minify_script(OxcScriptMinifier))
                .transform(Transform::concat(NewlineConcatenator, paths.script_bundle.clone())),
        )?;
        orchestrator.define_stage(
            Stage::new(STYLE_DEV, "css")?
                .input(paths.styles.clone())
                .transform(Transform::compile_style(compiler)),
        )?;
        orchestrator.define_stage(
            Stage::new(STYLE_PROD, "css")?
                .input(paths.styles.clone())
                .transform(Transform::compile_style(compiler))
                .transform(Transform::minify_style(LightningStyleMinifier))
                .transform(Transform::concat(NewlineConcatenator, paths.style_bundle.clone())),
        )?;
        orchestrator.define_stage(Stage::new(INDEX_COPY, "")?.input(paths.pages.clone()))?;

        let mut development = vec![SCRIPT_DEV, STYLE_DEV, INDEX_COPY];
        let mut production = vec![SCRIPT_PROD, STYLE_PROD, INDEX_COPY];
        if let Some(partials) = &paths.partials {
            orchestrator
                .define_stage(Stage::new(PARTIALS_COPY, "partials")?.input(partials.clone()))?;
            development.push(PARTIALS_COPY);
            production.push(PARTIALS_COPY);
            orchestrator.define_target(BUILD_PARTIALS, [PARTIALS_COPY])?;
        }

        orchestrator.define_target(BUILD_DEVELOPMENT, development)?;
        orchestrator.define_target(BUILD, production)?;
        orchestrator.define_target(BUILD_JAVASCRIPT_DEVELOPMENT, [SCRIPT_DEV])?;
        orchestrator.define_target(BUILD_JAVASCRIPT_PRODUCTION, [SCRIPT_PROD])?;
        orchestrator.define_target(BUILD_JAVASCRIPT, [SCRIPT_DEV, SCRIPT_PROD])?;
        orchestrator.define_target(BUILD_CSS_DEVELOPMENT, [STYLE_DEV])?;
        orchestrator.define_target(BUILD_CSS_PRODUCTION, [STYLE_PROD])?;
        orchestrator.define_target(BUILD_CSS, [STYLE_DEV, STYLE_PROD])?;
        orchestrator.define_target(BUILD_INDEX, [INDEX_COPY])?;

        Ok(orchestrator)
    }

    pub fn define_stage(&mut self, stage: Stage) -> Result<()> {
        if self.stages.contains_key(stage.id()) {
            return Err(PipelineError::DuplicateStage(stage.id().clone()));
        }
        self.stages.insert(stage.id().clone(), Arc::new(stage));
        Ok(())
    }

    /// Define a target. Every stage it names must already be defined.
    pub fn define_target<I, S>(&mut self, name: impl Into<String>, stages: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<StageId>,
    {
        let name = name.into();
        if self.targets.contains_key(&name) {
            return Err(PipelineError::DuplicateTarget(name));
        }

        let stages: Vec<StageId> = stages.into_iter().map(Into::into).collect();
        if let Some(missing) = stages.iter().find(|id| !self.stages.contains_key(*id)) {
            return Err(PipelineError::UnknownStage {
                target: name,
                stage: missing.clone(),
            });
        }

        self.targets.insert(name.clone(), Target { name, stages });
        Ok(())
    }

    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.get(name)
    }

    /// Run every stage of `name` concurrently and wait for all of them.
    ///
    /// Sibling stages keep running when one fails, and their outputs stay on
    /// disk. The returned `TargetFailed` carries every failure.
    pub async fn run_target(&self, name: &str) -> Result<TargetReport> {
        let target = self
            .targets
            .get(name)
            .ok_or_else(|| PipelineError::UnknownTarget(name.to_string()))?;

        let started = Instant::now();
        tracing::info!(target_name = %target.name, stages = target.stages.len(), "running target");

        let mut handles = Vec::with_capacity(target.stages.len());
        for id in &target.stages {
            // define_target guarantees the stage exists
            let Some(stage) = self.stages.get(id).cloned() else {
                continue;
            };
            let config = Arc::clone(&self.config);
            let handle = tokio::spawn(async move { stage.run(&config).await });
            handles.push((id.clone(), handle));
        }

        let mut reports = Vec::with_capacity(handles.len());
        let mut failures = Vec::new();
        for (stage, handle) in handles {
            match handle.await {
                Ok(Ok(report)) => reports.push(report),
                Ok(Err(error)) => {
                    tracing::error!(stage = %stage, error = %error, "stage failed");
                    failures.push(StageFailure {
                        stage,
                        error: Box::new(error),
                    });
                }
                Err(join) => failures.push(StageFailure {
                    stage,
                    error: Box::new(PipelineError::Join(join.to_string())),
                }),
            }
        }

        if !failures.is_empty() {
            return Err(PipelineError::TargetFailed {
                target: target.name.clone(),
                failures,
            });
        }

        let report = TargetReport {
            target: target.name.clone(),
            stages: reports,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            target_name = %report.target,
            files = report.file_count(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "target finished"
        );
        Ok(report)
    }

    /// Remove the whole distribution directory.
    ///
    /// Never fails: filesystem errors are logged and reported as `Skipped`.
    pub async fn clean(&self) -> CleanOutcome {
        let dist = self.config.dist_dir();
        match tokio::fs::remove_dir_all(&dist).await {
            Ok(()) => {
                tracing::info!(path = %dist.display(), "removed distribution directory");
                CleanOutcome::Removed(dist)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %dist.display(), "distribution directory already absent");
                CleanOutcome::Missing(dist)
            }
            Err(e) => {
                tracing::warn!(path = %dist.display(), error = %e, "could not remove distribution directory");
                CleanOutcome::Skipped {
                    path: dist,
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn standard_targets_without_partials() {
        let orchestrator = Orchestrator::new(Arc::new(Config::with_root("/project"))).unwrap();

        assert!(orchestrator.target("build").is_some());
        assert!(orchestrator.target("build-development").is_some());
        assert!(orchestrator.target("build-css").is_some());
        assert!(orchestrator.target("build-partials").is_none());

        let build = orchestrator.target("build").unwrap();
        let ids: Vec<&str> = build.stages.iter().map(|s| s.as_str()).collect();
        assert_eq!(ids, vec!["script-prod", "style-prod", "index-copy"]);
    }

    #[test]
    fn partials_add_a_stage_and_target() {
        let mut config = Config::with_root("/project");
        config.paths.partials = Some("src/partials/**/*".to_string());
        let orchestrator = Orchestrator::new(Arc::new(config)).unwrap();

        let dev = orchestrator.target("build-development").unwrap();
        assert!(dev.stages.iter().any(|s| s.as_str() == "partials-copy"));
        assert!(orchestrator.target("build-partials").is_some());
    }

    #[test]
    fn duplicate_definitions_are_rejected() {
        let mut orchestrator = Orchestrator::empty(Arc::new(Config::with_root("/project")));
        orchestrator
            .define_stage(Stage::new("copy", "").unwrap())
            .unwrap();

        assert!(matches!(
            orchestrator.define_stage(Stage::new("copy", "other").unwrap()),
            Err(PipelineError::DuplicateStage(_))
        ));

        orchestrator.define_target("all", ["copy"]).unwrap();
        assert!(matches!(
            orchestrator.define_target("all", ["copy"]),
            Err(PipelineError::DuplicateTarget(_))
        ));
    }

    #[tokio::test]
    async fn unknown_target_is_an_error() {
        let temp = TempDir::new().unwrap();
        let orchestrator = Orchestrator::new(Arc::new(Config::with_root(temp.path()))).unwrap();

        let err = orchestrator.run_target("deploy").await.unwrap_err();
        assert!(matches!(err, PipelineError::UnknownTarget(name) if name == "deploy"));
    }
}
