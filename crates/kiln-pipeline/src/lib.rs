//! Asset pipeline for kiln.
//!
//! The pipeline turns source globs into files under a single distribution
//! directory:
//!
//! ```text
//! glob → [Asset] → transform → transform → … → write under <dist>/<output_dir>
//! ```
//!
//! - [`stage`] - one source-to-output transformation ([`Stage`])
//! - [`transform`] - the transform operations and their collaborators
//! - [`orchestrator`] - named targets composed of stages, plus `clean`
//!
//! A stage computes every output in memory before touching the filesystem,
//! so a compile or minify error never leaves partial output behind.

pub mod asset;
pub mod error;
pub mod orchestrator;
pub mod sources;
pub mod stage;
pub mod transform;

pub use asset::Asset;
pub use error::{PipelineError, Result, StageFailure};
pub use orchestrator::{CleanOutcome, Orchestrator, Target, TargetReport};
pub use stage::{Stage, StageId, StageReport, WrittenFile};
pub use transform::{
    Concatenator, LightningStyleCompiler, LightningStyleMinifier, NewlineConcatenator,
    OxcScriptMinifier, ScriptMinifier, StyleCompiler, StyleMinifier, Transform, TransformError,
};
