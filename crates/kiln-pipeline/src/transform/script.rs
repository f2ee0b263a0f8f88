//! Script minification backed by the OXC toolchain.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::transform::{ScriptMinifier, TransformError};

/// Parses, compresses, mangles and prints scripts.
///
/// Plain `.js` files are treated as classic scripts so top-level bindings
/// stay global after concatenation; `.mjs` files are parsed as modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxcScriptMinifier;

impl ScriptMinifier for OxcScriptMinifier {
    fn minify(&self, path: &Path, source: &str) -> Result<String, TransformError> {
        let allocator = Allocator::default();

        let source_type = match path.extension().and_then(|ext| ext.to_str()) {
            Some("mjs") => SourceType::mjs(),
            _ => SourceType::cjs(),
        };

        let parsed = Parser::new(&allocator, source, source_type).parse();
        if parsed.panicked || !parsed.errors.is_empty() {
            let messages: Vec<String> = parsed.errors.iter().map(|e| e.to_string()).collect();
            return Err(TransformError::new(if messages.is_empty() {
                "failed to parse script".to_string()
            } else {
                messages.join(", ")
            }));
        }

        let mut program = parsed.program;
        let minified = Minifier::new(MinifierOptions::default()).minify(&allocator, &mut program);

        let code = Codegen::new()
            .with_options(CodegenOptions::minify())
            .with_scoping(minified.scoping)
            .build(&program)
            .code;

        Ok(code)
    }
}
