//! Pipeline error types.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::stage::StageId;

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A transform collaborator rejected a source file.
    #[error("{operation} failed in stage '{stage}' for {}: {message}", .file.display())]
    Transform {
        stage: StageId,
        operation: &'static str,
        file: PathBuf,
        message: String,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// Stage output directories must stay under the distribution root.
    #[error("output directory must be relative to the distribution root: {}", .0.display())]
    InvalidOutputDir(PathBuf),

    #[error("stage '{0}' is already defined")]
    DuplicateStage(StageId),

    #[error("target '{target}' references unknown stage '{stage}'")]
    UnknownStage { target: String, stage: StageId },

    #[error("target '{0}' is already defined")]
    DuplicateTarget(String),

    #[error("unknown target '{0}'")]
    UnknownTarget(String),

    /// One or more stages of a target failed; siblings may have written output.
    #[error("target '{target}' failed: {}", FailureList(.failures))]
    TargetFailed {
        target: String,
        failures: Vec<StageFailure>,
    },

    #[error("stage task did not complete: {0}")]
    Join(String),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A stage that failed while its target ran.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: StageId,
    pub error: Box<PipelineError>,
}

struct FailureList<'a>(&'a [StageFailure]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", failure.error)?;
        }
        Ok(())
    }
}
