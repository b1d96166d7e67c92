//! Classpath scan cache
//!
//! Persists a [`ClassScanningResult`] to `bin/.naftah_cache` (relative to the
//! current working directory, matching the source's cache location) so a
//! repeat bootstrap can skip rescanning the classpath.

use std::path::{Path, PathBuf};

use crate::host::types::ClassScanningResult;
use crate::interpreter::errors::ContextError;

pub const CACHE_RELATIVE_PATH: &str = "bin/.naftah_cache";

pub fn cache_path(working_dir: &Path) -> PathBuf {
    working_dir.join(CACHE_RELATIVE_PATH)
}

pub fn write(working_dir: &Path, result: &ClassScanningResult) -> Result<(), ContextError> {
    let path = cache_path(working_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ContextError::CachePersistFailed { cause: e.to_string() })?;
    }
    let contents = serde_json::to_string(result).map_err(|e| ContextError::CachePersistFailed { cause: e.to_string() })?;
    std::fs::write(&path, contents).map_err(|e| ContextError::CachePersistFailed { cause: e.to_string() })
}

pub fn read(working_dir: &Path) -> Result<Option<ClassScanningResult>, ContextError> {
    let path = cache_path(working_dir);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| ContextError::CachePersistFailed { cause: e.to_string() })?;
    let result = serde_json::from_str(&contents).map_err(|e| ContextError::CachePersistFailed { cause: e.to_string() })?;
    Ok(Some(result))
}
