//! JSON text → test source, via analyze → transform → generate.
//!
//! Each call is self-contained: nothing is shared between calls, so separate
//! documents may be compiled on separate threads.
use serde_json::Value;
use tracing::debug;

use crate::analyzer::{self, FieldKind};
use crate::generator::{self, GenerateError};
use crate::ir::Assertion;
use crate::options::CompilerOptions;
use crate::transformer;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("only objects and arrays are supported as the top-level value, found {}", .found.name())]
    UnsupportedRoot { found: FieldKind },
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Compile a JSON document into test source.
pub fn compile(json: &str, options: &CompilerOptions) -> Result<String, CompileError> {
    let document: Value = serde_json::from_str(json)?;
    compile_value(&document, options)
}

/// Same as [`compile`] for an already-parsed document.
pub fn compile_value(document: &Value, options: &CompilerOptions) -> Result<String, CompileError> {
    let assertions = assertions(document, options)?;
    let source = generator::generate(&assertions, &options.generator)?;
    Ok(source)
}

/// Run the pipeline up to, but not including, code generation.
pub fn assertions(document: &Value, options: &CompilerOptions) -> Result<Vec<Assertion>, CompileError> {
    let root = FieldKind::of(document);
    if !root.is_container() {
        return Err(CompileError::UnsupportedRoot { found: root });
    }

    let fields = analyzer::analyze(document, None);
    debug!(root = root.name(), fields = fields.len(), "analyzed document");

    Ok(transformer::transform(&fields, &options.transformer))
}
