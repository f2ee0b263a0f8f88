//! Style collaborators backed by lightningcss.

use std::path::Path;

use lightningcss::{
    printer::PrinterOptions,
    stylesheet::{MinifyOptions, ParserOptions, StyleSheet},
    targets::{Browsers, Targets},
};

use crate::transform::{StyleCompiler, StyleMinifier, TransformError};

/// Compiles nested, modern CSS into plain CSS.
///
/// Sources keep their own extension (`.styl` included) but must be written
/// in CSS syntax: braces and semicolons are required, and indentation-based
/// Stylus syntax is reported as a parse error.
///
/// With `lower_nesting` the output targets a browser floor without native
/// nesting, so nested rules are flattened into full selectors.
#[derive(Debug, Clone, Copy)]
pub struct LightningStyleCompiler {
    lower_nesting: bool,
}

impl LightningStyleCompiler {
    pub fn new(lower_nesting: bool) -> Self {
        Self { lower_nesting }
    }

    fn targets(&self) -> Targets {
        if !self.lower_nesting {
            return Targets::default();
        }

        Targets::from(Browsers {
            chrome: Some(100 << 16),
            firefox: Some(100 << 16),
            safari: Some(15 << 16),
            ..Browsers::default()
        })
    }
}

impl Default for LightningStyleCompiler {
    fn default() -> Self {
        Self::new(true)
    }
}

impl StyleCompiler for LightningStyleCompiler {
    fn compile(&self, path: &Path, source: &str) -> Result<String, TransformError> {
        let stylesheet = parse(path, source)?;

        let result = stylesheet
            .to_css(PrinterOptions {
                minify: false,
                targets: self.targets(),
                ..Default::default()
            })
            .map_err(|e| TransformError::new(format!("failed to print CSS: {}", e)))?;

        Ok(result.code)
    }
}

/// Minifies CSS: merges rules, shortens values and drops whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct LightningStyleMinifier;

impl StyleMinifier for LightningStyleMinifier {
    fn minify(&self, path: &Path, css: &str) -> Result<String, TransformError> {
        let mut stylesheet = parse(path, css)?;

        stylesheet
            .minify(MinifyOptions::default())
            .map_err(|e| TransformError::new(format!("failed to minify CSS: {}", e)))?;

        let result = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| TransformError::new(format!("failed to print CSS: {}", e)))?;

        Ok(result.code)
    }
}

fn parse<'i>(path: &Path, source: &'i str) -> Result<StyleSheet<'i>, TransformError> {
    StyleSheet::parse(
        source,
        ParserOptions {
            filename: path.to_string_lossy().to_string(),
            ..Default::default()
        },
    )
    .map_err(|e| TransformError::new(e.to_string()))
}
