//! Bundle output: the output directory and the bundle files inside it.

pub mod writer;

pub use writer::write_bundle;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Make sure the output directory exists.
///
/// Returns `true` if it had to be created. Safe to call repeatedly.
pub fn ensure_output_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        debug!("Output directory exists: {}", path.display());
        return Ok(false);
    }

    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create output directory: {}", path.display()))?;
    Ok(true)
}
