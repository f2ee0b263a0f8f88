//! Asset transform stages.

use std::borrow::Borrow;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use kiln_config::Config;

use crate::asset::Asset;
use crate::error::{PipelineError, Result};
use crate::sources;
use crate::transform::Transform;

/// Identifier of a stage (`script-dev`, `style-prod`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StageId(String);

impl StageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for StageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for StageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One source-to-output transformation.
///
/// Holds no state between runs: every run re-reads its inputs and overwrites
/// its outputs wholesale.
#[derive(Debug, Clone)]
pub struct Stage {
    id: StageId,
    inputs: Vec<String>,
    transforms: Vec<Transform>,
    output_dir: PathBuf,
}

/// A file written by a stage run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Outcome of a successful stage run.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: StageId,
    pub files: Vec<WrittenFile>,
    pub elapsed: Duration,
}

impl Stage {
    /// Create a stage writing under `<dist>/<output_dir>`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOutputDir` if `output_dir` is absolute or climbs out of
    /// the distribution root.
    pub fn new(id: impl Into<StageId>, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        let escapes = output_dir
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(PipelineError::InvalidOutputDir(output_dir));
        }

        Ok(Self {
            id: id.into(),
            inputs: Vec::new(),
            transforms: Vec::new(),
            output_dir,
        })
    }

    /// Add an input glob, relative to the project root.
    pub fn input(mut self, pattern: impl Into<String>) -> Self {
        self.inputs.push(pattern.into());
        self
    }

    /// Append a transform to the pipeline.
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn id(&self) -> &StageId {
        &self.id
    }

    /// Read the inputs, run every transform, then write the outputs.
    ///
    /// Outputs are only written once every transform has succeeded for every
    /// asset, and each file is renamed into place, so a failed run leaves the
    /// previous outputs untouched.
    pub async fn run(&self, config: &Config) -> Result<StageReport> {
        let started = Instant::now();
        let mut assets = sources::collect(config, &self.inputs).await?;
        tracing::debug!(stage = %self.id, inputs = assets.len(), "stage started");

        for transform in &self.transforms {
            assets = transform.apply(assets).map_err(|failure| {
                tracing::debug!(
                    stage = %self.id,
                    file = %failure.file.display(),
                    "transform failed"
                );
                PipelineError::Transform {
                    stage: self.id.clone(),
                    operation: failure.operation,
                    file: failure.file,
                    message: failure.error.message,
                }
            })?;
        }

        let dest = config.dist_dir().join(&self.output_dir);
        let mut files = Vec::with_capacity(assets.len());
        for asset in &assets {
            files.push(write_asset(&dest, asset).await?);
        }

        let elapsed = started.elapsed();
        tracing::debug!(
            stage = %self.id,
            outputs = files.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "stage finished"
        );

        Ok(StageReport {
            stage: self.id.clone(),
            files,
            elapsed,
        })
    }
}

/// Suffix source for temp files; overlapping runs of one stage must not share one.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Write one asset through a sibling temp file and rename it into place.
async fn write_asset(dest: &Path, asset: &Asset) -> Result<WrittenFile> {
    let target = dest.join(&asset.path);
    let parent = target.parent().unwrap_or(dest);
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| PipelineError::io(parent, e))?;

    let file_name = target
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let temp = parent.join(format!(
        ".{}.{}-{}.kiln-tmp",
        file_name,
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    tokio::fs::write(&temp, &asset.contents)
        .await
        .map_err(|e| PipelineError::io(&temp, e))?;
    if let Err(e) = tokio::fs::rename(&temp, &target).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(PipelineError::io(&target, e));
    }

    Ok(WrittenFile {
        path: target,
        bytes: asset.contents.len() as u64,
    })
}
