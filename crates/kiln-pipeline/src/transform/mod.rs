//! Transform operations and the collaborators behind them.
//!
//! A stage holds an ordered list of [`Transform`]s. Each operation delegates
//! the actual work to a collaborator trait so the compiler, minifiers and
//! concatenator can be swapped without touching stage logic:
//!
//! - [`StyleCompiler`] - style source dialect → CSS ([`LightningStyleCompiler`])
//! - [`StyleMinifier`] - CSS → minified CSS ([`LightningStyleMinifier`])
//! - [`ScriptMinifier`] - script → minified script ([`OxcScriptMinifier`])
//! - [`Concatenator`] - many files → one named file ([`NewlineConcatenator`])

mod concat;
mod script;
mod style;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::asset::Asset;

pub use concat::NewlineConcatenator;
pub use script::OxcScriptMinifier;
pub use style::{LightningStyleCompiler, LightningStyleMinifier};

/// Error reported by a collaborator for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransformError {
    pub message: String,
}

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Compiles a style source dialect into CSS.
pub trait StyleCompiler: Send + Sync {
    fn compile(&self, path: &Path, source: &str) -> Result<String, TransformError>;
}

/// Produces a size-reduced equivalent of compiled CSS.
pub trait StyleMinifier: Send + Sync {
    fn minify(&self, path: &Path, css: &str) -> Result<String, TransformError>;
}

/// Produces a size-reduced equivalent of script source.
pub trait ScriptMinifier: Send + Sync {
    fn minify(&self, path: &Path, source: &str) -> Result<String, TransformError>;
}

/// Combines an ordered sequence of files into one file called `name`.
pub trait Concatenator: Send + Sync {
    fn concat(&self, parts: &[Asset], name: &str) -> Asset;
}

/// One operation in a stage's pipeline.
#[derive(Clone)]
pub enum Transform {
    /// Compile each asset and rename it to `.css`.
    CompileStyle(Arc<dyn StyleCompiler>),
    MinifyStyle(Arc<dyn StyleMinifier>),
    MinifyScript(Arc<dyn ScriptMinifier>),
    /// Collapse every asset into a single asset called `name`.
    Concat {
        concatenator: Arc<dyn Concatenator>,
        name: String,
    },
}

/// A transform that failed on a specific asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformFailure {
    pub operation: &'static str,
    pub file: PathBuf,
    pub error: TransformError,
}

impl Transform {
    pub fn compile_style(compiler: impl StyleCompiler + 'static) -> Self {
        Self::CompileStyle(Arc::new(compiler))
    }

    pub fn minify_style(minifier: impl StyleMinifier + 'static) -> Self {
        Self::MinifyStyle(Arc::new(minifier))
    }

    pub fn minify_script(minifier: impl ScriptMinifier + 'static) -> Self {
        Self::MinifyScript(Arc::new(minifier))
    }

    pub fn concat(concatenator: impl Concatenator + 'static, name: impl Into<String>) -> Self {
        Self::Concat {
            concatenator: Arc::new(concatenator),
            name: name.into(),
        }
    }

    /// Operation name used in logs and errors.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::CompileStyle(_) => "compile-style",
            Self::MinifyStyle(_) => "minify-style",
            Self::MinifyScript(_) => "minify-script",
            Self::Concat { .. } => "concat",
        }
    }

    /// Apply the operation to every asset.
    ///
    /// Stops at the first failing asset; nothing is written by a transform.
    pub fn apply(&self, assets: Vec<Asset>) -> Result<Vec<Asset>, TransformFailure> {
        match self {
            Self::CompileStyle(compiler) => self.map_text(assets, |asset, source| {
                compiler.compile(&asset.path, source)
            })
            .map(|assets| {
                assets
                    .into_iter()
                    .map(|asset| asset.with_extension("css"))
                    .collect()
            }),
            Self::MinifyStyle(minifier) => {
                self.map_text(assets, |asset, css| minifier.minify(&asset.path, css))
            }
            Self::MinifyScript(minifier) => {
                self.map_text(assets, |asset, source| minifier.minify(&asset.path, source))
            }
            Self::Concat { concatenator, name } => {
                if assets.is_empty() {
                    return Ok(assets);
                }
                Ok(vec![concatenator.concat(&assets, name)])
            }
        }
    }

    fn map_text<F>(&self, assets: Vec<Asset>, mut f: F) -> Result<Vec<Asset>, TransformFailure>
    where
        F: FnMut(&Asset, &str) -> Result<String, TransformError>,
    {
        assets
            .into_iter()
            .map(|asset| {
                let output = asset
                    .text()
                    .and_then(|text| f(&asset, text))
                    .map_err(|error| TransformFailure {
                        operation: self.operation(),
                        file: asset.path.clone(),
                        error,
                    })?;
                Ok(asset.with_contents(output))
            })
            .collect()
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concat { name, .. } => f.debug_struct("Concat").field("name", name).finish(),
            other => f.write_str(other.operation()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl ScriptMinifier for Upper {
        fn minify(&self, path: &Path, source: &str) -> Result<String, TransformError> {
            if source.contains("bad") {
                return Err(TransformError::new(format!("rejected {}", path.display())));
            }
            Ok(source.to_uppercase())
        }
    }

    #[test]
    fn text_transform_maps_every_asset() {
        let transform = Transform::minify_script(Upper);
        let out = transform
            .apply(vec![Asset::new("a.js", "a"), Asset::new("b.js", "b")])
            .unwrap();

        assert_eq!(out, vec![Asset::new("a.js", "A"), Asset::new("b.js", "B")]);
    }

    #[test]
    fn failure_names_the_offending_file() {
        let transform = Transform::minify_script(Upper);
        let failure = transform
            .apply(vec![Asset::new("ok.js", "fine"), Asset::new("nested/x.js", "bad")])
            .unwrap_err();

        assert_eq!(failure.operation, "minify-script");
        assert_eq!(failure.file, PathBuf::from("nested/x.js"));
        assert_eq!(failure.error.message, "rejected nested/x.js");
    }

    #[test]
    fn concat_of_nothing_is_nothing() {
        let transform = Transform::concat(NewlineConcatenator, "weel.js");
        assert!(transform.apply(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn debug_shows_operation() {
        let transform = Transform::concat(NewlineConcatenator, "weel.css");
        assert_eq!(format!("{:?}", transform), "Concat { name: \"weel.css\" }");
        assert_eq!(
            format!("{:?}", Transform::minify_script(Upper)),
            "minify-script"
        );
    }
}
