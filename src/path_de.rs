//! Config loading with JSON-path context in error messages.
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::options::CompilerOptions;

#[derive(Debug, thiserror::Error)]
#[error("at JSON path {path} → {source}")]
pub struct PathError {
    pub path: String,
    source: serde_json::Error,
}

/// Deserialize, naming the offending path on failure.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| PathError {
        path: err.path().to_string(),
        source: err.into_inner(),
    })
}

/// Read compiler options from a JSON config file.
pub fn load_options(path: &Path) -> anyhow::Result<CompilerOptions> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let options = from_str_with_path(&source)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    tracing::debug!(config = %path.display(), "loaded compiler options");
    Ok(options)
}
